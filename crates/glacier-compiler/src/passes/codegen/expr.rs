//! Expression lowering.
//!
//! Every expression leaves exactly one value on the stack, except calls to
//! void functions and assignments, which leave none.

use glacier_core::InternalError;
use glacier_parser::ast::{
    BinaryExpr, BinaryOp, CallExpr, ConstructorExpr, Expr, ExprKind, IndexExpr, MapExpr,
    MemberExpr, MethodCallExpr, Type, VectorExpr,
};

use super::{CodeGenerator, Result};
use crate::bytecode::OpCode;
use crate::intrinsics::Intrinsic;

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    pub(crate) fn gen_expr(&mut self, expr: &'ast Expr<'ast>) -> Result<()> {
        match &expr.kind {
            ExprKind::Int(value) => self.emitter.emit_int(*value)?,
            ExprKind::String(value) => self.emitter.emit_string(value)?,
            ExprKind::Vector(vector) => self.gen_vector(vector)?,
            ExprKind::Map(map) => self.gen_map(map)?,
            ExprKind::Variable(ident) => {
                let slot = self.slot_of(ident.name)?;
                self.emitter.emit_get_var(slot)?;
            }
            ExprKind::Binary(binary) => self.gen_binary(binary)?,
            ExprKind::Index(index) => self.gen_index(index)?,
            ExprKind::Member(member) => self.gen_member(member)?,
            ExprKind::Constructor(ctor) => self.gen_constructor(ctor)?,
            ExprKind::Call(call) => self.gen_call(call)?,
            ExprKind::MethodCall(call) => self.gen_method_call(call)?,
        }
        Ok(())
    }

    fn slot_of(&self, name: &str) -> Result<u32> {
        self.scope.lookup(name).map(|var| var.slot).ok_or_else(|| {
            InternalError::UnknownVariable {
                name: name.to_string(),
            }
            .into()
        })
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    /// `VEC n` pops the first element last, so elements go on in reverse.
    fn gen_vector(&mut self, vector: &'ast VectorExpr<'ast>) -> Result<()> {
        for &element in vector.elements.iter().rev() {
            self.gen_expr(element)?;
        }
        self.emitter.emit_vector(vector.elements.len())?;
        Ok(())
    }

    fn gen_map(&mut self, map: &'ast MapExpr<'ast>) -> Result<()> {
        for entry in map.entries {
            self.gen_expr(entry.key)?;
            self.gen_expr(entry.value)?;
        }
        self.emitter.emit_map(map.entries.len())?;
        Ok(())
    }

    // ==========================================================================
    // Operators
    // ==========================================================================

    /// Binary operators.
    ///
    /// The VM only compares with `EQ` and `LT`. The rest are rewritten
    /// without changing the order operands are evaluated in:
    ///
    /// ```text
    /// a != b   a b EQ INT 0 EQ
    /// a >= b   a b LT INT 0 EQ
    /// a >  b   INT 0 a b SUB LT
    /// a <= b   INT 0 a b SUB LT INT 0 EQ
    /// ```
    fn gen_binary(&mut self, binary: &'ast BinaryExpr<'ast>) -> Result<()> {
        match binary.op {
            BinaryOp::Assign => return self.gen_assign(binary),
            BinaryOp::Add => self.gen_operands(binary, OpCode::Add)?,
            BinaryOp::Sub => self.gen_operands(binary, OpCode::Subtract)?,
            BinaryOp::Mul => self.gen_operands(binary, OpCode::Multiply)?,
            BinaryOp::Div => self.gen_operands(binary, OpCode::Divide)?,
            BinaryOp::Equal => self.gen_operands(binary, OpCode::Eq)?,
            BinaryOp::Less => self.gen_operands(binary, OpCode::Lt)?,
            BinaryOp::NotEqual => {
                self.gen_operands(binary, OpCode::Eq)?;
                self.gen_negate()?;
            }
            BinaryOp::GreaterEqual => {
                self.gen_operands(binary, OpCode::Lt)?;
                self.gen_negate()?;
            }
            BinaryOp::Greater => {
                self.emitter.emit_int(0)?;
                self.gen_operands(binary, OpCode::Subtract)?;
                self.emitter.emit(OpCode::Lt);
            }
            BinaryOp::LessEqual => {
                self.emitter.emit_int(0)?;
                self.gen_operands(binary, OpCode::Subtract)?;
                self.emitter.emit(OpCode::Lt);
                self.gen_negate()?;
            }
        }
        Ok(())
    }

    fn gen_operands(&mut self, binary: &'ast BinaryExpr<'ast>, op: OpCode) -> Result<()> {
        self.gen_expr(binary.left)?;
        self.gen_expr(binary.right)?;
        self.emitter.emit(op);
        Ok(())
    }

    /// Logical not of a 0/1 value.
    fn gen_negate(&mut self) -> Result<()> {
        self.emitter.emit_int(0)?;
        self.emitter.emit(OpCode::Eq);
        Ok(())
    }

    fn gen_assign(&mut self, binary: &'ast BinaryExpr<'ast>) -> Result<()> {
        match &binary.left.kind {
            ExprKind::Variable(ident) => {
                self.gen_expr(binary.right)?;
                let slot = self.slot_of(ident.name)?;
                self.emitter.emit_set_var(slot)?;
            }
            ExprKind::Member(member) => {
                // SET_STRUCT_MEMBER pops the struct, then the value.
                self.gen_expr(binary.right)?;
                self.gen_expr(member.base)?;
                let slot = member.slot().ok_or_else(|| InternalError::UnresolvedMember {
                    member: member.member.name.to_string(),
                })?;
                self.emitter.emit_set_member(slot.index)?;
            }
            _ => {
                return Err(InternalError::InvalidAssignTarget {
                    span: binary.left.span,
                }
                .into());
            }
        }
        Ok(())
    }

    fn gen_index(&mut self, index: &'ast IndexExpr<'ast>) -> Result<()> {
        let op = match Self::type_of(index.base)? {
            Type::Map(_, _) => OpCode::MapAccess,
            _ => OpCode::VecAccess,
        };
        self.gen_expr(index.base)?;
        self.gen_expr(index.index)?;
        self.emitter.emit(op);
        Ok(())
    }

    // ==========================================================================
    // Structs
    // ==========================================================================

    fn gen_member(&mut self, member: &'ast MemberExpr<'ast>) -> Result<()> {
        let slot = member.slot().ok_or_else(|| InternalError::UnresolvedMember {
            member: member.member.name.to_string(),
        })?;
        self.gen_expr(member.base)?;
        self.emitter.emit_get_member(slot.index)?;
        Ok(())
    }

    /// One value per member in declaration order: the argument when given,
    /// otherwise the member's default.
    fn gen_constructor(&mut self, ctor: &'ast ConstructorExpr<'ast>) -> Result<()> {
        let name = ctor.name.name;
        let structs = self.structs;
        let info = structs
            .get(name)
            .ok_or_else(|| InternalError::UnknownStruct {
                name: name.to_string(),
            })?;

        for (i, member) in info.members().iter().enumerate() {
            let value = match ctor.args.get(i) {
                Some(&arg) => arg,
                None => member.default.ok_or_else(|| InternalError::MissingDefault {
                    struct_name: name.to_string(),
                    member: member.name.name.to_string(),
                })?,
            };
            self.gen_expr(value)?;
        }
        self.emitter.emit_construct(info.type_id)?;
        Ok(())
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn gen_call(&mut self, call: &'ast CallExpr<'ast>) -> Result<()> {
        if let Some(intrinsic) = Intrinsic::lookup(call.callee.name) {
            return intrinsic.codegen(self, call);
        }
        for &arg in call.args {
            self.gen_expr(arg)?;
        }
        let id = self.function_id(call.callee.name)?;
        self.emitter.emit_call(id)?;
        Ok(())
    }

    /// The receiver is the leading `this` argument.
    fn gen_method_call(&mut self, call: &'ast MethodCallExpr<'ast>) -> Result<()> {
        self.gen_expr(call.receiver)?;
        for &arg in call.args {
            self.gen_expr(arg)?;
        }
        let id = self.function_id(call.method.name)?;
        self.emitter.emit_call(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::body;
    use crate::bytecode::Instruction;

    /// Body of `main` between its marker and the trailing `RETURN`.
    fn main_body(stmts: &str) -> Vec<Instruction> {
        let mut body = body(&format!("fn main() -> void {{ {stmts} }}"));
        assert_eq!(body.remove(0), Instruction::FunctionDef { id: 0, params: 0 });
        assert_eq!(body.pop(), Some(Instruction::Return));
        body
    }

    #[test]
    fn arithmetic_evaluates_left_to_right() {
        assert_eq!(
            main_body("let x = 2 + 3 * 4;"),
            vec![
                Instruction::Int(2),
                Instruction::Int(3),
                Instruction::Int(4),
                Instruction::Multiply,
                Instruction::Add,
                Instruction::SetVar(0),
            ]
        );
    }

    #[test]
    fn comparison_lowering() {
        use Instruction::*;
        assert_eq!(main_body("1 == 2;"), vec![Int(1), Int(2), Eq]);
        assert_eq!(main_body("1 < 2;"), vec![Int(1), Int(2), Lt]);
        assert_eq!(main_body("1 != 2;"), vec![Int(1), Int(2), Eq, Int(0), Eq]);
        assert_eq!(main_body("1 >= 2;"), vec![Int(1), Int(2), Lt, Int(0), Eq]);
        assert_eq!(main_body("1 > 2;"), vec![Int(0), Int(1), Int(2), Subtract, Lt]);
        assert_eq!(
            main_body("1 <= 2;"),
            vec![Int(0), Int(1), Int(2), Subtract, Lt, Int(0), Eq]
        );
    }

    #[test]
    fn vector_elements_are_reversed() {
        assert_eq!(
            main_body("let v = [1, 2, 3] <int>;"),
            vec![
                Instruction::Int(3),
                Instruction::Int(2),
                Instruction::Int(1),
                Instruction::Vec(3),
                Instruction::SetVar(0),
            ]
        );
    }

    #[test]
    fn map_pairs_in_order() {
        assert_eq!(
            main_body("let m = {\"a\": 1, \"b\": 2} <string, int>;"),
            vec![
                Instruction::String("a".into()),
                Instruction::Int(1),
                Instruction::String("b".into()),
                Instruction::Int(2),
                Instruction::Map(2),
                Instruction::SetVar(0),
            ]
        );
    }

    #[test]
    fn indexing_picks_access_opcode() {
        assert_eq!(
            main_body("let v = [] <int>; let m = {} <int, int>; v[0]; m[1];"),
            vec![
                Instruction::Vec(0),
                Instruction::SetVar(0),
                Instruction::Map(0),
                Instruction::SetVar(1),
                Instruction::GetVar(0),
                Instruction::Int(0),
                Instruction::VecAccess,
                Instruction::GetVar(1),
                Instruction::Int(1),
                Instruction::MapAccess,
            ]
        );
    }

    #[test]
    fn variable_assignment() {
        assert_eq!(
            main_body("let x = 1; x = x + 1;"),
            vec![
                Instruction::Int(1),
                Instruction::SetVar(0),
                Instruction::GetVar(0),
                Instruction::Int(1),
                Instruction::Add,
                Instruction::SetVar(0),
            ]
        );
    }

    #[test]
    fn constructor_fills_defaults() {
        let body = body(
            r#"
            struct P { int x; string name = "p"; int y = 7; };
            fn main() -> void { let p = new P(5); }
            "#,
        );
        assert_eq!(
            body,
            vec![
                Instruction::FunctionDef { id: 0, params: 0 },
                Instruction::Int(5),
                Instruction::String("p".into()),
                Instruction::Int(7),
                Instruction::Struct(2),
                Instruction::SetVar(0),
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn member_read_and_write() {
        let body = body(
            r#"
            struct P { int x = 0; int y = 0; };
            fn main() -> void { let p = new P(); p.y = p.x; }
            "#,
        );
        assert_eq!(
            &body[5..],
            &[
                Instruction::GetVar(0),
                Instruction::GetStructMember(0),
                Instruction::GetVar(0),
                Instruction::SetStructMember(1),
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn member_slot_follows_receiver_type() {
        // Both structs have `v`; the slot comes from the receiver's struct.
        let body = body(
            r#"
            struct A { int v = 0; };
            struct B { int pad = 0; int v = 0; };
            fn main() -> void { let b = new B(); print(b.v); }
            "#,
        );
        assert!(body.contains(&Instruction::GetStructMember(1)));
    }

    #[test]
    fn calls_push_arguments_left_to_right() {
        let body = body(
            r#"
            fn main() -> void { add(1, 2); }
            fn add(int a, int b) -> int { return a + b; }
            "#,
        );
        assert_eq!(
            &body[..4],
            &[
                Instruction::FunctionDef { id: 0, params: 0 },
                Instruction::Int(1),
                Instruction::Int(2),
                Instruction::CallFunc(1),
            ]
        );
    }

    #[test]
    fn method_call_pushes_receiver_first() {
        let body = body(
            r#"
            struct C { int n = 0; fn add(int k) -> void { this.n = this.n + k; } };
            fn main() -> void { let c = new C(); c.add(4); }
            "#,
        );
        let main = body
            .iter()
            .position(|i| *i == Instruction::FunctionDef { id: 0, params: 0 })
            .unwrap();
        assert_eq!(
            &body[main + 4..main + 7],
            &[
                Instruction::GetVar(0),
                Instruction::Int(4),
                Instruction::CallFunc(1),
            ]
        );
    }

    #[test]
    fn intrinsics_lower_to_single_opcodes() {
        use Instruction::*;
        assert_eq!(
            main_body("let v = [] <int>; push(v, 1); len(v); pop(v);"),
            vec![
                Vec(0),
                SetVar(0),
                GetVar(0),
                Int(1),
                VecPush,
                GetVar(0),
                VecLen,
                GetVar(0),
                VecPop,
            ]
        );
        assert_eq!(
            main_body("let m = {} <string, string>; insert(m, readStr(), \"v\"); readInt();"),
            vec![
                Map(0),
                SetVar(0),
                GetVar(0),
                ReadStr,
                String("v".into()),
                MapInsert,
                ReadInt,
            ]
        );
    }
}
