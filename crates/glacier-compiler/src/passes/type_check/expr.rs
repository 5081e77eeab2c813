//! Expression typing.

use glacier_core::{Span, TypeError};
use glacier_parser::ast::{
    BinaryExpr, BinaryOp, CallExpr, ConstructorExpr, Expr, ExprKind, IndexExpr, MapExpr,
    MemberExpr, MethodCallExpr, Param, Type, VectorExpr,
};

use super::{Result, TypeChecker};
use crate::intrinsics::Intrinsic;
use crate::registry::StructInfo;

impl<'a, 'ast> TypeChecker<'a, 'ast> {
    /// Deduce the type of `expr` and record it on the node.
    pub(crate) fn check_expr(&mut self, expr: &'ast Expr<'ast>) -> Result<Type<'ast>> {
        let ty = match &expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::String(_) => Type::String,
            ExprKind::Vector(vector) => self.check_vector(vector, expr.span)?,
            ExprKind::Map(map) => self.check_map(map, expr.span)?,
            ExprKind::Variable(ident) => {
                self.scope
                    .lookup(ident.name)
                    .map(|var| var.ty)
                    .ok_or_else(|| TypeError::UnknownVariable {
                        name: ident.name.to_string(),
                        span: ident.span,
                    })?
            }
            ExprKind::Binary(binary) => self.check_binary(binary, expr.span)?,
            ExprKind::Index(index) => self.check_index(index)?,
            ExprKind::Member(member) => self.check_member(member)?,
            ExprKind::Constructor(ctor) => self.check_constructor(ctor, expr.span)?,
            ExprKind::Call(call) => self.check_call(call, expr.span)?,
            ExprKind::MethodCall(call) => self.check_method_call(call, expr.span)?,
        };
        expr.set_ty(ty);
        Ok(ty)
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    fn check_vector(&mut self, vector: &'ast VectorExpr<'ast>, span: Span) -> Result<Type<'ast>> {
        self.check_type(vector.elem_type, span)?;
        for (i, &element) in vector.elements.iter().enumerate() {
            self.expect_type(
                element,
                *vector.elem_type,
                &format!("element {i} of vector literal"),
            )?;
        }
        Ok(vector.ty())
    }

    fn check_map(&mut self, map: &'ast MapExpr<'ast>, span: Span) -> Result<Type<'ast>> {
        self.check_type(map.key_type, span)?;
        self.check_type(map.value_type, span)?;
        for (i, entry) in map.entries.iter().enumerate() {
            self.expect_type(entry.key, *map.key_type, &format!("key {i} of map literal"))?;
            self.expect_type(
                entry.value,
                *map.value_type,
                &format!("value {i} of map literal"),
            )?;
        }
        Ok(map.ty())
    }

    // ==========================================================================
    // Operators
    // ==========================================================================

    fn check_binary(&mut self, binary: &'ast BinaryExpr<'ast>, span: Span) -> Result<Type<'ast>> {
        if binary.op == BinaryOp::Assign {
            return self.check_assign(binary);
        }

        let left = self.check_value(binary.left)?;
        let right = self.check_value(binary.right)?;

        // `==` and `!=` lower to EQ, which compares ints only.
        if left != Type::Int || right != Type::Int {
            return Err(TypeError::OperandMismatch {
                op: binary.op.as_str().to_string(),
                left: left.to_string(),
                right: right.to_string(),
                span,
            });
        }
        Ok(Type::Int)
    }

    fn check_assign(&mut self, binary: &'ast BinaryExpr<'ast>) -> Result<Type<'ast>> {
        if !matches!(
            binary.left.kind,
            ExprKind::Variable(_) | ExprKind::Member(_)
        ) {
            return Err(TypeError::NotAssignable {
                span: binary.left.span,
            });
        }
        let target = self.check_value(binary.left)?;
        self.expect_type(binary.right, target, "assigned value")?;
        Ok(Type::Void)
    }

    fn check_index(&mut self, index: &'ast IndexExpr<'ast>) -> Result<Type<'ast>> {
        match self.check_value(index.base)? {
            Type::Vector(elem) => {
                self.expect_type(index.index, Type::Int, "vector index")?;
                Ok(*elem)
            }
            Type::Map(key, value) => {
                self.expect_type(index.index, *key, "map key")?;
                Ok(*value)
            }
            other => Err(TypeError::NotIndexable {
                found: other.to_string(),
                span: index.base.span,
            }),
        }
    }

    // ==========================================================================
    // Structs
    // ==========================================================================

    /// Struct behind a value's type.
    fn struct_of(&self, ty: Type<'ast>, span: Span) -> Result<&'a StructInfo<'ast>> {
        let structs = self.structs;
        match ty {
            Type::User(name) => structs.get(name).ok_or_else(|| TypeError::UnknownStruct {
                name: name.to_string(),
                span,
            }),
            other => Err(TypeError::NotAStruct {
                found: other.to_string(),
                span,
            }),
        }
    }

    fn check_member(&mut self, member: &'ast MemberExpr<'ast>) -> Result<Type<'ast>> {
        let base = self.check_value(member.base)?;
        let info = self.struct_of(base, member.base.span)?;
        let (slot, decl) = info
            .member(member.member.name)
            .ok_or_else(|| TypeError::UnknownMember {
                type_name: info.name().to_string(),
                member: member.member.name.to_string(),
                span: member.member.span,
            })?;
        member.resolve(slot);
        Ok(decl.ty)
    }

    fn check_constructor(
        &mut self,
        ctor: &'ast ConstructorExpr<'ast>,
        span: Span,
    ) -> Result<Type<'ast>> {
        let name = ctor.name.name;
        let structs = self.structs;
        let info = structs.get(name).ok_or_else(|| TypeError::UnknownStruct {
            name: name.to_string(),
            span: ctor.name.span,
        })?;
        let members = info.members();

        if ctor.args.len() > members.len() {
            return Err(TypeError::TooManyConstructorArgs {
                struct_name: name.to_string(),
                members: members.len(),
                got: ctor.args.len(),
                span,
            });
        }

        for (i, (&arg, member)) in ctor.args.iter().zip(members).enumerate() {
            let found = self.check_value(arg)?;
            if found != member.ty {
                return Err(TypeError::ArgumentType {
                    callee: format!("new {name}"),
                    position: i + 1,
                    expected: member.ty.to_string(),
                    found: found.to_string(),
                    span: arg.span,
                });
            }
        }

        let uncovered = &members[ctor.args.len()..];
        if uncovered.is_empty() {
            return Ok(Type::User(name));
        }

        // Uncovered members are filled from their defaults at this call
        // site, so those defaults must not construct this struct again.
        if self.expanding.contains(&name) {
            return Err(TypeError::RecursiveDefault {
                struct_name: name.to_string(),
                span,
            });
        }
        self.expanding.push(name);
        let result = self.with_empty_scope(|this| {
            for member in uncovered {
                let Some(default) = member.default else {
                    return Err(TypeError::MissingMemberValue {
                        struct_name: name.to_string(),
                        member: member.name.name.to_string(),
                        span,
                    });
                };
                this.check_value(default)?;
            }
            Ok(())
        });
        self.expanding.pop();
        result?;

        Ok(Type::User(name))
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn check_call(&mut self, call: &'ast CallExpr<'ast>, span: Span) -> Result<Type<'ast>> {
        let name = call.callee.name;
        if let Some(intrinsic) = Intrinsic::lookup(name) {
            return intrinsic.type_check(self, call, span);
        }

        let decl = self
            .functions
            .get(name)
            .ok_or_else(|| TypeError::UnknownFunction {
                name: name.to_string(),
                span: call.callee.span,
            })?;
        self.check_arguments(name, decl.params, call.args, span)?;
        Ok(decl.return_type)
    }

    fn check_method_call(
        &mut self,
        call: &'ast MethodCallExpr<'ast>,
        span: Span,
    ) -> Result<Type<'ast>> {
        let receiver = self.check_value(call.receiver)?;
        let info = self.struct_of(receiver, call.receiver.span)?;
        let name = call.method.name;
        let decl = info
            .decl
            .method(name)
            .ok_or_else(|| TypeError::UnknownMethod {
                type_name: info.name().to_string(),
                method: name.to_string(),
                span: call.method.span,
            })?;

        // The receiver fills the leading `this` parameter.
        let params = decl.params.get(1..).unwrap_or_default();
        self.check_arguments(name, params, call.args, span)?;
        Ok(decl.return_type)
    }

    fn check_arguments(
        &mut self,
        callee: &str,
        params: &'ast [Param<'ast>],
        args: &'ast [&'ast Expr<'ast>],
        span: Span,
    ) -> Result<()> {
        if params.len() != args.len() {
            return Err(TypeError::ArgumentCount {
                callee: callee.to_string(),
                expected: params.len(),
                got: args.len(),
                span,
            });
        }
        for (i, (param, &arg)) in params.iter().zip(args).enumerate() {
            let found = self.check_value(arg)?;
            if found != param.ty {
                return Err(TypeError::ArgumentType {
                    callee: callee.to_string(),
                    position: i + 1,
                    expected: param.ty.to_string(),
                    found: found.to_string(),
                    span: arg.span,
                });
            }
        }
        Ok(())
    }
}
