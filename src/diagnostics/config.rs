use std::str::FromStr;

/// Which source lines a stage should print trace output for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TracingConfig {
    All,
    Between(usize, usize),
    Before(usize),
    After(usize),
    Only(usize),
    Off,
}

impl TracingConfig {
    pub fn includes(&self, line: usize) -> bool {
        match *self {
            TracingConfig::All => true,
            TracingConfig::Only(ln) => line == ln,
            TracingConfig::Before(ln) => line <= ln,
            TracingConfig::After(ln) => line >= ln,
            TracingConfig::Between(start, end) => line >= start && line <= end,
            TracingConfig::Off => false,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig::Off
    }
}

/// Parses the command line form of a tracing range:
/// `all`, `off`, `N`, `..N`, `N..` or `N..M`.
impl FromStr for TracingConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_line = |l: &str| {
            l.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line number in trace range: {}", l))
        };

        match s.trim() {
            "all" => Ok(TracingConfig::All),
            "off" => Ok(TracingConfig::Off),
            range => match range.find("..") {
                None => parse_line(range).map(TracingConfig::Only),
                Some(idx) => {
                    let (start, end) = (&range[..idx], &range[idx + 2..]);
                    match (start.is_empty(), end.is_empty()) {
                        (true, true) => Ok(TracingConfig::All),
                        (true, false) => parse_line(end).map(TracingConfig::Before),
                        (false, true) => parse_line(start).map(TracingConfig::After),
                        (false, false) => {
                            Ok(TracingConfig::Between(parse_line(start)?, parse_line(end)?))
                        }
                    }
                }
            },
        }
    }
}
