use crate::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::token::{format_literal_number, Token};

/// Renders AST nodes in the `Variant(field=value, ...)` text form.
///
/// Tokens use their token text form, sequences render as `[a, b]` and
/// absent optional fields as `null`. A program prints one top‑level
/// statement per line.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_program(statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Block(statements) => {
                format!("Block(statements={})", list(statements, Self::print_stmt))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => format!(
                "Class(name={}, superClass={}, methods={})",
                name,
                optional(superclass.as_ref(), Self::print_expr),
                list(methods, |m| Self::print_function(m))
            ),

            Stmt::Expression(expr) => format!("Expression(expression={})", Self::print_expr(expr)),

            Stmt::Function(decl) => Self::print_function(decl),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "If(condition={}, thenBranch={}, elseBranch={})",
                Self::print_expr(condition),
                Self::print_stmt(then_branch),
                optional(else_branch.as_deref(), Self::print_stmt)
            ),

            Stmt::Print(expr) => format!("Print(expression={})", Self::print_expr(expr)),

            Stmt::Return { keyword, value } => format!(
                "Return(keyword={}, value={})",
                keyword,
                optional(value.as_ref(), Self::print_expr)
            ),

            Stmt::Var { name, initializer } => format!(
                "Var(name={}, initializer={})",
                name,
                optional(initializer.as_ref(), Self::print_expr)
            ),

            Stmt::While { condition, body } => format!(
                "While(condition={}, body={})",
                Self::print_expr(condition),
                Self::print_stmt(body)
            ),
        }
    }

    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            Expr::Assign { name, value, .. } => {
                format!("Assign(name={}, value={})", name, Self::print_expr(value))
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => format!(
                "Binary(left={}, operator={}, right={})",
                Self::print_expr(left),
                operator,
                Self::print_expr(right)
            ),

            Expr::Call {
                callee,
                paren,
                arguments,
            } => format!(
                "Call(callee={}, paren={}, arguments={})",
                Self::print_expr(callee),
                paren,
                list(arguments, Self::print_expr)
            ),

            Expr::Get { object, name } => {
                format!("Get(object={}, name={})", Self::print_expr(object), name)
            }

            Expr::Grouping(inner) => format!("Grouping(expression={})", Self::print_expr(inner)),

            Expr::Literal(lit) => format!("Literal(value={})", Self::print_literal(lit)),

            Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "Logical(left={}, operator={}, right={})",
                Self::print_expr(left),
                operator,
                Self::print_expr(right)
            ),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "Set(object={}, name={}, value={})",
                Self::print_expr(object),
                name,
                Self::print_expr(value)
            ),

            Expr::Super {
                keyword, method, ..
            } => format!("Super(keyword={}, method={})", keyword, method),

            Expr::This { keyword, .. } => format!("This(keyword={})", keyword),

            Expr::Unary { operator, right } => format!(
                "Unary(operator={}, right={})",
                operator,
                Self::print_expr(right)
            ),

            Expr::Variable { name, .. } => format!("Variable(name={})", name),
        }
    }

    fn print_function(decl: &FunctionDecl) -> String {
        format!(
            "Function(name={}, parameters={}, body={})",
            decl.name,
            list(&decl.params, Token::to_string),
            list(&decl.body, Self::print_stmt)
        )
    }

    fn print_literal(lit: &LiteralValue) -> String {
        match lit {
            LiteralValue::Number(n) => format_literal_number(*n),
            LiteralValue::Str(s) => s.clone(),
            LiteralValue::True => "true".into(),
            LiteralValue::False => "false".into(),
            LiteralValue::Nil => "null".into(),
        }
    }
}

fn list<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    let inner: Vec<String> = items.iter().map(render).collect();

    format!("[{}]", inner.join(", "))
}

fn optional<T: ?Sized>(item: Option<&T>, render: impl Fn(&T) -> String) -> String {
    item.map_or_else(|| "null".to_string(), render)
}
