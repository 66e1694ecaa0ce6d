pub mod arena;
pub mod builder;
pub mod context;
pub mod dfg;
pub mod error;
pub mod function;
pub mod ident;
pub mod inst;
pub mod ir_writer;
pub mod ops;
pub mod types;
pub mod value;
pub mod visitor;

pub use arena::{Arena, ArenaConfig, ArenaSlice, CHUNK_SIZE};
pub use builder::FunctionBuilder;
pub use context::{Context, ContextConfig};
pub use dfg::{BlockData, BlockId, DataFlowGraph};
pub use error::{IrError, IrResult};
pub use function::Function;
pub use ident::{Hasher, Id, IdentTable, Identifier, Name};
pub use inst::{HasSlots, Inst, InstData, InstKind};
pub use ir_writer::FuncWriter;
pub use ops::{Assoc, OpProperties, OpTable};
pub use types::{ConRef, ForeignFuncRef, FuncRef, Type};
pub use value::{is_terminating, Use, ValueData, ValueId, ValueKind};
