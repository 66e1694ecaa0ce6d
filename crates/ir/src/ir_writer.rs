use std::io;

use crate::{
    inst::{InstData, PhiAlt},
    BlockId, Context, Function, ValueId, ValueKind,
};

/// Renders a function as text, resolving names through `ctx`.
pub struct FuncWriter<'a> {
    func: &'a Function,
    ctx: &'a Context,
    level: u8,
}

impl<'a> FuncWriter<'a> {
    pub fn new(func: &'a Function, ctx: &'a Context) -> Self {
        Self {
            func,
            ctx,
            level: 0,
        }
    }

    pub fn write(&mut self, mut w: impl io::Write) -> io::Result<()> {
        w.write_all(b"func %")?;
        match self.ctx.find(self.func.name) {
            Some(name) => w.write_all(name.as_bytes())?,
            None => write!(w, "{}", self.func.name)?,
        }

        w.write_all(b"(")?;
        let mut args = self.func.args().iter().peekable();
        while let Some(arg) = args.next() {
            self.write_def(*arg, &mut w)?;
            if args.peek().is_some() {
                w.write_all(b", ")?;
            }
        }
        w.write_all(b")")?;

        self.enter_item(&mut w)?;
        for block in self.func.blocks() {
            self.write_block_with_insts(block, &mut w)?;
        }
        self.leave_item();

        Ok(())
    }

    pub fn dump_string(&mut self) -> io::Result<String> {
        let mut s = Vec::new();
        self.write(&mut s)?;
        String::from_utf8(s).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Renders the single line defining `value`, without indentation.
    pub fn dump_value(&self, value: ValueId) -> io::Result<String> {
        let mut s = Vec::new();
        if self.func.dfg.value_kind(value) == ValueKind::Arg {
            self.write_def(value, &mut s)?;
        } else {
            self.write_value_line(value, &mut s)?;
        }
        String::from_utf8(s).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn write_block_with_insts(&mut self, block: BlockId, mut w: impl io::Write) -> io::Result<()> {
        self.indent(&mut w)?;
        write!(w, "{block}")?;

        self.enter_item(&mut w)?;
        for &value in self.func.dfg.block(block).insts() {
            self.indent(&mut w)?;
            self.write_value_line(value, &mut w)?;
            self.newline(&mut w)?;
        }
        self.leave_item();

        Ok(())
    }

    /// Writes `v<n>.<type>`, followed by ` %<name>` for named values.
    fn write_def(&self, value: ValueId, mut w: impl io::Write) -> io::Result<()> {
        let data = self.func.dfg.value(value);
        write!(w, "{value}")?;
        if let Some(ty) = data.ty() {
            write!(w, ".{ty}")?;
        }
        if let Some(name) = data.name() {
            w.write_all(b" %")?;
            match self.ctx.find(name) {
                Some(name) => w.write_all(name.as_bytes())?,
                None => write!(w, "{name}")?,
            }
        }
        Ok(())
    }

    fn write_value_line(&self, value: ValueId, mut w: impl io::Write) -> io::Result<()> {
        let data = self.func.dfg.value(value);
        let kind = data.kind();
        if !kind.is_terminating() {
            self.write_def(value, &mut w)?;
            w.write_all(b" = ")?;
        }
        w.write_all(kind.as_str().as_bytes())?;

        match kind {
            ValueKind::ConstInt => {
                if let Some(imm) = data.const_int() {
                    write!(w, " {imm}")?;
                }
            }
            ValueKind::ConstFloat => {
                if let Some(imm) = data.const_float() {
                    write!(w, " {imm:?}")?;
                }
            }
            ValueKind::ConstString => {
                if let Some(slice) = data.const_string() {
                    write!(w, " {:?}", self.ctx.str(slice))?;
                }
            }
            _ => {}
        }

        if let Some(inst) = data.inst() {
            self.write_inst_args(inst, &mut w)?;
        }
        Ok(())
    }

    fn write_inst_args(&self, inst: &InstData, mut w: impl io::Write) -> io::Result<()> {
        use InstData::*;

        match inst {
            ICmp(data) => write!(w, " {} {} {}", data.cond(), data.lhs(), data.rhs()),
            FCmp(data) => write!(w, " {} {} {}", data.cond(), data.lhs(), data.rhs()),
            Record(data) => write!(w, " {} {}", data.con(), data.arg()),
            Tup(data) => self.write_slots(data.fields(), &mut w),
            Fun(data) => {
                write!(w, " {}", data.body())?;
                self.write_slots(data.frame(), &mut w)
            }
            Call(data) | CallGen(data) => {
                write!(w, " {}", data.fun())?;
                self.write_slots(data.args(), &mut w)
            }
            CallForeign(data) => {
                write!(w, " {}", data.fun())?;
                self.write_slots(data.args(), &mut w)
            }
            CallDyn(data) | CallDynGen(data) => {
                write!(w, " {}", data.fun())?;
                self.write_slots(data.args(), &mut w)
            }
            Je(data) => write!(w, " {} {} {}", data.cond(), data.then(), data.otherwise()),
            Jmp(data) => write!(w, " {}", data.to()),
            Phi(data) => self.write_phi_alts(data.alts(), &mut w),
            _ => {
                for value in inst.operands() {
                    write!(w, " {value}")?;
                }
                Ok(())
            }
        }
    }

    /// Unset slots print as `_`.
    fn write_slots(&self, slots: &[Option<ValueId>], mut w: impl io::Write) -> io::Result<()> {
        for slot in slots {
            match slot {
                Some(value) => write!(w, " {value}")?,
                None => w.write_all(b" _")?,
            }
        }
        Ok(())
    }

    fn write_phi_alts(&self, alts: &[PhiAlt], mut w: impl io::Write) -> io::Result<()> {
        for alt in alts {
            write!(w, " ({} {})", alt.value, alt.from)?;
        }
        Ok(())
    }

    fn indent(&self, mut w: impl io::Write) -> io::Result<()> {
        w.write_all(" ".repeat(self.level as usize * 4).as_bytes())
    }

    fn newline(&self, mut w: impl io::Write) -> io::Result<()> {
        w.write_all(b"\n")
    }

    fn enter_item(&mut self, mut w: impl io::Write) -> io::Result<()> {
        self.level += 1;
        w.write_all(b":\n")
    }

    fn leave_item(&mut self) {
        self.level -= 1;
    }
}
