use tracing::trace;

use crate::{
    inst::{
        empty_slots, Binary, Call, CallData, CallDyn, CallDynData, CallDynGen, CallForeign,
        CallForeignData, CallGen, Cast, FCmp, FCmpCond, FCmpData, Fun, FunData, HasSlots, ICmp,
        ICmpCond, ICmpData, Inst, InstKind, Je, JeData, Jmp, JmpData, Phi, PhiAlt, PhiData,
        Record, RecordData, Ret, RetData, Shift, Tup, TupData,
    },
    inst::{
        Add, And, Div, FAdd, FDiv, FExt, FMul, FSub, FTrunc, IDiv, IRem, Mul, Or, Rem, SExt, Sar,
        Shl, Shr, Sub, Trunc, Xor, ZExt,
    },
    value::{Payload, ValueData},
    BlockId, ConRef, Context, ForeignFuncRef, FuncRef, Function, Id, IrError, IrResult, Type,
    ValueId, ValueKind,
};

/// Appends values to a [`Function`], interning through a [`Context`].
///
/// Every factory places its value at the end of `block`, records the uses of
/// its operands and returns a handle to it.
pub struct FunctionBuilder<'a> {
    ctx: &'a mut Context,
    func: &'a mut Function,
}

macro_rules! impl_cast_inst {
    ($name:ident, $kind:ident) => {
        pub fn $name(
            &mut self,
            block: BlockId,
            name: Option<Id>,
            from: ValueId,
            to: Type,
        ) -> Inst<$kind> {
            self.insert_inst::<$kind>(block, name, Some(to), Cast::new(from))
        }
    };
}

macro_rules! impl_binary_inst {
    ($name:ident, $kind:ident) => {
        pub fn $name(
            &mut self,
            block: BlockId,
            name: Option<Id>,
            lhs: ValueId,
            rhs: ValueId,
        ) -> Inst<$kind> {
            let ty = self.func.dfg.value_ty(lhs);
            self.insert_inst::<$kind>(block, name, ty, Binary::new(lhs, rhs))
        }
    };
}

macro_rules! impl_shift_inst {
    ($name:ident, $kind:ident) => {
        pub fn $name(
            &mut self,
            block: BlockId,
            name: Option<Id>,
            arg: ValueId,
            amount: ValueId,
        ) -> Inst<$kind> {
            let ty = self.func.dfg.value_ty(arg);
            self.insert_inst::<$kind>(block, name, ty, Shift::new(arg, amount))
        }
    };
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(ctx: &'a mut Context, func: &'a mut Function) -> Self {
        Self { ctx, func }
    }

    pub fn ctx(&self) -> &Context {
        self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut Context {
        self.ctx
    }

    pub fn func(&self) -> &Function {
        self.func
    }

    /// Interns `text` as an unqualified value name.
    pub fn name(&mut self, text: &str) -> IrResult<Id> {
        self.ctx.add_unqualified_name(text)
    }

    pub fn append_block(&mut self) -> BlockId {
        let block = self.func.dfg.make_block();
        trace!(%block, "appended block");
        block
    }

    pub fn append_arg(&mut self, ty: Type, name: Option<Id>) -> ValueId {
        let index = self.func.arg_values.len() as u32;
        let value = self.func.dfg.make_arg(ty, index, name);
        self.func.arg_values.push(value);
        trace!(%value, index, "appended argument");
        value
    }

    pub fn args(&self) -> &[ValueId] {
        self.func.args()
    }

    pub fn type_of(&self, value: ValueId) -> Option<Type> {
        self.func.dfg.value_ty(value)
    }

    pub fn const_int(&mut self, block: BlockId, ty: Type, value: i64) -> ValueId {
        self.insert_value(block, ValueData::new(Some(ty), None, Payload::ConstInt(value)))
    }

    pub fn const_float(&mut self, block: BlockId, ty: Type, value: f64) -> ValueId {
        self.insert_value(
            block,
            ValueData::new(Some(ty), None, Payload::ConstFloat(value)),
        )
    }

    /// Makes a string constant. The text is copied into the context arena.
    pub fn const_string(&mut self, block: BlockId, ty: Type, text: &str) -> ValueId {
        let slice = self.ctx.alloc_str(text);
        self.insert_value(
            block,
            ValueData::new(Some(ty), None, Payload::ConstString(slice)),
        )
    }

    /// Returns the text of the string constant `value`.
    pub fn const_str_text(&self, value: ValueId) -> IrResult<&str> {
        let data = self.func.dfg.value(value);
        let slice = data.const_string().ok_or(IrError::KindMismatch {
            inst: value,
            expected: ValueKind::ConstString,
            found: data.kind(),
        })?;
        Ok(self.ctx.str(slice))
    }

    impl_cast_inst!(trunc, Trunc);
    impl_cast_inst!(ftrunc, FTrunc);
    impl_cast_inst!(zext, ZExt);
    impl_cast_inst!(sext, SExt);
    impl_cast_inst!(fext, FExt);

    impl_binary_inst!(add, Add);
    impl_binary_inst!(sub, Sub);
    impl_binary_inst!(mul, Mul);
    impl_binary_inst!(div, Div);
    impl_binary_inst!(idiv, IDiv);
    impl_binary_inst!(rem, Rem);
    impl_binary_inst!(irem, IRem);
    impl_binary_inst!(fadd, FAdd);
    impl_binary_inst!(fsub, FSub);
    impl_binary_inst!(fmul, FMul);
    impl_binary_inst!(fdiv, FDiv);
    impl_binary_inst!(bitand, And);
    impl_binary_inst!(or, Or);
    impl_binary_inst!(xor, Xor);

    impl_shift_inst!(shl, Shl);
    impl_shift_inst!(shr, Shr);
    impl_shift_inst!(sar, Sar);

    pub fn icmp(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        lhs: ValueId,
        rhs: ValueId,
        cond: ICmpCond,
        ty: Type,
    ) -> Inst<ICmp> {
        self.insert_inst::<ICmp>(block, name, Some(ty), ICmpData::new(lhs, rhs, cond))
    }

    pub fn fcmp(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        lhs: ValueId,
        rhs: ValueId,
        cond: FCmpCond,
        ty: Type,
    ) -> Inst<FCmp> {
        self.insert_inst::<FCmp>(block, name, Some(ty), FCmpData::new(lhs, rhs, cond))
    }

    pub fn record(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        con: ConRef,
        arg: ValueId,
        ty: Type,
    ) -> Inst<Record> {
        self.insert_inst::<Record>(block, name, Some(ty), RecordData::new(con, arg))
    }

    /// Makes a tuple with `field_count` unset fields; fill them with
    /// [`Self::set_arg`].
    pub fn tup(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        ty: Type,
        field_count: usize,
    ) -> Inst<Tup> {
        self.insert_inst::<Tup>(block, name, Some(ty), TupData::new(field_count))
    }

    pub fn fun(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        body: FuncRef,
        ty: Type,
        frame_count: usize,
    ) -> Inst<Fun> {
        self.insert_inst::<Fun>(block, name, Some(ty), FunData::new(body, frame_count))
    }

    pub fn call(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        fun: FuncRef,
        ty: Type,
        arg_count: usize,
    ) -> Inst<Call> {
        let data = CallData::new(fun, empty_slots(arg_count));
        self.insert_inst::<Call>(block, name, Some(ty), data)
    }

    pub fn call_gen(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        fun: FuncRef,
        ty: Type,
        arg_count: usize,
    ) -> Inst<CallGen> {
        let data = CallData::new(fun, empty_slots(arg_count));
        self.insert_inst::<CallGen>(block, name, Some(ty), data)
    }

    /// Makes a call through the closure `fun`. The use of `fun` is recorded
    /// right away; the arguments as they are set.
    pub fn call_dyn(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        fun: ValueId,
        ty: Type,
        arg_count: usize,
    ) -> Inst<CallDyn> {
        let data = CallDynData::new(fun, empty_slots(arg_count));
        self.insert_inst::<CallDyn>(block, name, Some(ty), data)
    }

    pub fn call_dyn_gen(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        fun: ValueId,
        ty: Type,
        arg_count: usize,
    ) -> Inst<CallDynGen> {
        let data = CallDynData::new(fun, empty_slots(arg_count));
        self.insert_inst::<CallDynGen>(block, name, Some(ty), data)
    }

    pub fn call_foreign(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        fun: ForeignFuncRef,
        ty: Type,
        arg_count: usize,
    ) -> Inst<CallForeign> {
        let data = CallForeignData::new(fun, empty_slots(arg_count));
        self.insert_inst::<CallForeign>(block, name, Some(ty), data)
    }

    /// Stores `value` in slot `index` of `inst` and records the use.
    ///
    /// Setting a slot twice replaces the earlier operand.
    pub fn set_arg<K: HasSlots>(
        &mut self,
        inst: Inst<K>,
        index: usize,
        value: ValueId,
    ) -> IrResult<()> {
        self.func.dfg.set_slot(inst, index, value)?;
        trace!(inst = %inst.value(), index, %value, "set argument slot");
        Ok(())
    }

    /// Returns the indices of the slots of `inst` that are still unset.
    pub fn unset_slots<K: HasSlots>(&self, inst: Inst<K>) -> Vec<usize> {
        self.func
            .dfg
            .slots(inst)
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.is_none().then_some(idx))
            .collect()
    }

    /// Fails on the first slot of `inst` that was never set.
    pub fn finalize_args<K: HasSlots>(&self, inst: Inst<K>) -> IrResult<()> {
        match self.unset_slots(inst).first() {
            Some(&index) => Err(IrError::UnsetSlot {
                inst: inst.value(),
                index,
            }),
            None => Ok(()),
        }
    }

    pub fn je(
        &mut self,
        block: BlockId,
        cond: ValueId,
        then: BlockId,
        otherwise: BlockId,
    ) -> Inst<Je> {
        self.insert_inst::<Je>(block, None, None, JeData::new(cond, then, otherwise))
    }

    pub fn jmp(&mut self, block: BlockId, to: BlockId) -> Inst<Jmp> {
        self.insert_inst::<Jmp>(block, None, None, JmpData::new(to))
    }

    pub fn ret(&mut self, block: BlockId, value: Option<ValueId>) -> Inst<Ret> {
        self.insert_inst::<Ret>(block, None, None, RetData::new(value))
    }

    /// Makes a phi merging one alternative per predecessor of `block`.
    ///
    /// Phis must precede every other value in their block.
    pub fn phi(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        ty: Type,
        alts: Vec<PhiAlt>,
    ) -> Inst<Phi> {
        self.insert_inst::<Phi>(block, name, Some(ty), PhiData::new(alts))
    }

    fn insert_inst<K: InstKind>(
        &mut self,
        block: BlockId,
        name: Option<Id>,
        ty: Option<Type>,
        data: K::Data,
    ) -> Inst<K> {
        let data = ValueData::new(ty, name, Payload::Inst(K::wrap(data)));
        Inst::new(self.insert_value(block, data))
    }

    fn insert_value(&mut self, block: BlockId, data: ValueData) -> ValueId {
        let kind = data.kind();
        let value = self.func.dfg.append_value(block, data);
        trace!(%value, %kind, %block, "appended value");
        value
    }
}
