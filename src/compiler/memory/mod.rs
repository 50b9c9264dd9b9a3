/**
 * Hardware specific analysis which is done before any code is generated.
 *
 * The following tasks are performed by this submodule
 * 1. Build a global table of all struct types, assigning each field a word
 * sized slot at a fixed offset within the struct and computing the size of
 * every struct.
 * 2. Record the signature of every function and compute the size of its stack
 * frame from the locals declared in its body.
 * 3. Construct a string pool of all string literals.
 * 4. Track the variables visible at each point of a function body while its
 * code is generated.
 */
pub mod stack;
pub mod stringpool;
pub mod struct_definition;
pub mod struct_table;
pub mod symbol_table;

pub use stack::{align16, declare_signatures, infer_type, size_frames};
pub use stringpool::StringPool;
pub use struct_definition::{FieldInfo, StructInfo, WORD_SIZE};
pub use struct_table::resolve_struct_layouts;
pub use symbol_table::{Address, FuncInfo, SymbolTable, ValueType, VarInfo};
