//! Indented outline of a parsed [`Program`], for debugging the front end.
//!
//! One node per line, children indented two spaces under their parent.
//! Annotations recorded by later passes (types, member slots, function ids)
//! are printed when present, so the same dump works before and after
//! checking.

use std::fmt::{self, Write};

use super::{Expr, ExprKind, FunctionDecl, Item, MapEntry, Program, Stmt, StructDecl};

impl Program<'_> {
    /// Render the program as an indented outline.
    ///
    /// ```
    /// use glacier_parser::Parser;
    /// use bumpalo::Bump;
    ///
    /// let arena = Bump::new();
    /// let program = Parser::parse("fn main() -> void { print(1); }", &arena).unwrap();
    /// let dump = program.dump();
    /// assert!(dump.starts_with("fn main() -> void"));
    /// assert!(dump.contains("call print"));
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = AstDumper::new(&mut out).program(self);
        out
    }
}

struct AstDumper<'w, W: Write> {
    out: &'w mut W,
    depth: usize,
}

impl<'w, W: Write> AstDumper<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self { out, depth: 0 }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str("  ")?;
        }
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn program(&mut self, program: &Program<'_>) -> fmt::Result {
        for item in program.items() {
            match item {
                Item::Function(decl) => self.function(decl)?,
                Item::Struct(decl) => self.structure(decl)?,
            }
        }
        Ok(())
    }

    fn structure(&mut self, decl: &StructDecl<'_>) -> fmt::Result {
        self.line(format_args!("struct {}", decl.name.name))?;
        self.nested(|d| {
            for member in decl.members {
                d.line(format_args!("member {} {}", member.ty, member.name.name))?;
                if let Some(default) = member.default {
                    d.nested(|d| d.expr(default))?;
                }
            }
            for method in decl.methods {
                d.function(method)?;
            }
            Ok(())
        })
    }

    fn function(&mut self, decl: &FunctionDecl<'_>) -> fmt::Result {
        let params = decl
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name.name))
            .collect::<Vec<_>>()
            .join(", ");
        match decl.id() {
            Some(id) => self.line(format_args!(
                "fn {}({params}) -> {} #{id}",
                decl.name.name, decl.return_type
            ))?,
            None => self.line(format_args!(
                "fn {}({params}) -> {}",
                decl.name.name, decl.return_type
            ))?,
        }
        self.nested(|d| d.block(decl.body))
    }

    fn block(&mut self, stmts: &[Stmt<'_>]) -> fmt::Result {
        stmts.iter().try_for_each(|stmt| self.stmt(stmt))
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) -> fmt::Result {
        match stmt {
            Stmt::Let(s) => {
                self.line(format_args!("let {}", s.name.name))?;
                self.nested(|d| d.expr(s.init))
            }
            Stmt::If(s) => {
                self.line(format_args!("if"))?;
                self.nested(|d| d.expr(s.condition))?;
                self.line(format_args!("then"))?;
                self.nested(|d| d.block(s.then_branch))?;
                if !s.else_branch.is_empty() {
                    self.line(format_args!("else"))?;
                    self.nested(|d| d.block(s.else_branch))?;
                }
                Ok(())
            }
            Stmt::While(s) => {
                self.line(format_args!("while"))?;
                self.nested(|d| d.expr(s.condition))?;
                self.line(format_args!("do"))?;
                self.nested(|d| d.block(s.body))
            }
            Stmt::Return(s) => {
                self.line(format_args!("return"))?;
                match s.value {
                    Some(value) => self.nested(|d| d.expr(value)),
                    None => Ok(()),
                }
            }
            Stmt::Expr(s) => self.expr(s.expr),
        }
    }

    fn expr(&mut self, expr: &Expr<'_>) -> fmt::Result {
        let ty = match expr.ty() {
            Some(ty) => format!(" : {ty}"),
            None => String::new(),
        };
        match &expr.kind {
            ExprKind::Int(value) => self.line(format_args!("int {value}{ty}")),
            ExprKind::String(text) => self.line(format_args!("string {text:?}{ty}")),
            ExprKind::Variable(name) => self.line(format_args!("var {}{ty}", name.name)),
            ExprKind::Vector(v) => {
                self.line(format_args!("vector <{}>{ty}", v.elem_type))?;
                self.exprs(v.elements)
            }
            ExprKind::Map(m) => {
                self.line(format_args!("map <{}, {}>{ty}", m.key_type, m.value_type))?;
                self.nested(|d| {
                    m.entries
                        .iter()
                        .try_for_each(|MapEntry { key, value }| {
                            d.line(format_args!("entry"))?;
                            d.nested(|d| {
                                d.expr(key)?;
                                d.expr(value)
                            })
                        })
                })
            }
            ExprKind::Binary(b) => {
                self.line(format_args!("binary {}{ty}", b.op))?;
                self.nested(|d| {
                    d.expr(b.left)?;
                    d.expr(b.right)
                })
            }
            ExprKind::Index(i) => {
                self.line(format_args!("index{ty}"))?;
                self.nested(|d| {
                    d.expr(i.base)?;
                    d.expr(i.index)
                })
            }
            ExprKind::Member(m) => {
                match m.slot() {
                    Some(slot) => self.line(format_args!(
                        "member {} [{}]{ty}",
                        m.member.name, slot.index
                    ))?,
                    None => self.line(format_args!("member {}{ty}", m.member.name))?,
                }
                self.nested(|d| d.expr(m.base))
            }
            ExprKind::Constructor(c) => {
                self.line(format_args!("new {}{ty}", c.name.name))?;
                self.exprs(c.args)
            }
            ExprKind::Call(c) => {
                self.line(format_args!("call {}{ty}", c.callee.name))?;
                self.exprs(c.args)
            }
            ExprKind::MethodCall(c) => {
                self.line(format_args!("method {}{ty}", c.method.name))?;
                self.nested(|d| d.expr(c.receiver))?;
                self.exprs(c.args)
            }
        }
    }

    fn exprs(&mut self, exprs: &[&Expr<'_>]) -> fmt::Result {
        self.nested(|d| exprs.iter().try_for_each(|e| d.expr(e)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Parser;
    use bumpalo::Bump;

    #[test]
    fn outline_nests_by_depth() {
        let arena = Bump::new();
        let source = r#"
            struct Point {
                int x = 0;
                fn get() -> int { return this.x; }
            };
            fn main() -> void {
                let p = new Point(2);
                if (p.get() < 3) { print("small"); }
            }
        "#;
        let program = Parser::parse(source, &arena).unwrap();
        let expected = "\
struct Point
  member int x
    int 0
  fn get(Point this) -> int
    return
      member x
        var this
fn main() -> void
  let p
    new Point
      int 2
  if
    binary <
      method get
        var p
      int 3
  then
    call print
      string \"small\"
";
        assert_eq!(program.dump(), expected);
    }

    #[test]
    fn collections_show_their_types() {
        let arena = Bump::new();
        let source = "fn main() -> void { let m = {1: \"a\"} <int, string>; let v = [] <int>; }";
        let program = Parser::parse(source, &arena).unwrap();
        let dump = program.dump();
        assert!(dump.contains("map <int, string>\n      entry\n        int 1\n        string \"a\"\n"));
        assert!(dump.contains("vector <int>\n"));
    }
}
