use serde::Serialize;

/**
The types that can be written in a declaration. `Named` refers to a type
declared with `type X struct {...}`; it is resolved against the struct table
when code is generated. `Struct` is the literal struct type on the right hand
side of a type declaration.
 */
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Type {
    Primitive(Primitive),
    Named(String),
    Struct(Vec<(String, Type)>),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Primitive {
    Int,
    Bool,
    String,
}

impl Type {
    pub fn int() -> Type {
        Type::Primitive(Primitive::Int)
    }

    pub fn bool() -> Type {
        Type::Primitive(Primitive::Bool)
    }

    pub fn string() -> Type {
        Type::Primitive(Primitive::String)
    }

    /// Maps a type name as written in source onto a type. Anything that is
    /// not a builtin is a reference to a declared type.
    pub fn from_name(name: &str) -> Type {
        match name {
            "int" => Type::int(),
            "bool" => Type::bool(),
            "string" => Type::string(),
            _ => Type::Named(name.into()),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            Type::Primitive(Primitive::Int) => f.write_str("int"),
            Type::Primitive(Primitive::Bool) => f.write_str("bool"),
            Type::Primitive(Primitive::String) => f.write_str("string"),
            Type::Named(name) => f.write_str(name),
            Type::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|(n, t)| format!("{} {}", n, t))
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "struct {{ {} }}", fields)
            }
        }
    }
}
