mod func_builder;

pub use func_builder::FunctionBuilder;

pub mod test_util {
    use crate::{ir_writer::FuncWriter, Context, Function};

    /// Makes a context and an empty function named `test_func`.
    pub fn test_func() -> (Context, Function) {
        let mut ctx = Context::new();
        let name = ctx
            .add_unqualified_name("test_func")
            .expect("fresh context has no collisions");
        (ctx, Function::new(name))
    }

    pub fn dump_func(ctx: &Context, func: &Function) -> String {
        FuncWriter::new(func, ctx)
            .dump_string()
            .expect("writing to a buffer can't fail")
    }
}
