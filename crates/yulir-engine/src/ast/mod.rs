//! Yul syntax tree
//!
//! The validated tree handed over by the analyzer. Statement and expression
//! kinds form closed sum types so every consumer matches exhaustively.
//! The JSON form is internally tagged by `kind`.

use serde::{Deserialize, Serialize};

/// Semantic type name (`u256`, `bool`, ...). Empty means "untyped" and is
/// resolved to the configured default type.
pub type TypeName = String;

/// Name with an optional semantic type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedName {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: TypeName,
}

impl TypedName {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A braced sequence of statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Block(Block),
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    ExpressionStatement(ExpressionStatement),
    If(If),
    Switch(Switch),
    ForLoop(ForLoop),
    Break,
    Continue,
    FunctionDefinition(FunctionDefinition),
    /// Stack-flavoured construct (`name:`)
    Label(Label),
    /// Stack-flavoured construct (`=: name`)
    StackAssignment(StackAssignment),
}

/// `let a, b := value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub variables: Vec<TypedName>,
    #[serde(default)]
    pub value: Option<Box<Expression>>,
}

/// `a, b := value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub variable_names: Vec<Identifier>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// Single-armed conditional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub condition: Box<Expression>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub expression: Box<Expression>,
    pub cases: Vec<Case>,
}

/// Switch arm; `value: None` is the default arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    #[serde(default)]
    pub value: Option<Literal>,
    pub body: Block,
}

/// `for { pre } condition { post } { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoop {
    pub pre: Block,
    pub condition: Box<Expression>,
    pub post: Block,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypedName>,
    #[serde(default)]
    pub return_variables: Vec<TypedName>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackAssignment {
    pub variable_name: Identifier,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    FunctionCall(FunctionCall),
    /// Raw EVM instruction with arguments, e.g. `add(1, 2)` in loose Yul
    FunctionalInstruction(FunctionalInstruction),
    /// Raw EVM instruction without arguments
    Instruction(Instruction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Number,
    Boolean,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub literal_kind: LiteralKind,
    /// Source spelling: decimal or `0x` hex for numbers, `true`/`false`,
    /// or the unquoted string contents
    pub value: String,
    #[serde(default, rename = "type")]
    pub ty: TypeName,
}

impl Literal {
    pub fn number(value: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            literal_kind: LiteralKind::Number,
            value: value.into(),
            ty: ty.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            literal_kind: LiteralKind::Boolean,
            value: value.to_string(),
            ty: "bool".to_string(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            literal_kind: LiteralKind::String,
            value: value.into(),
            ty: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function_name: Identifier,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalInstruction {
    pub instruction: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub instruction: String,
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier { name: name.into() })
    }

    pub fn number(value: impl Into<String>, ty: impl Into<String>) -> Self {
        Expression::Literal(Literal::number(value, ty))
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall(FunctionCall {
            function_name: Identifier { name: name.into() },
            arguments,
        })
    }
}

impl Statement {
    pub fn declare(variables: Vec<TypedName>, value: Option<Expression>) -> Self {
        Statement::VariableDeclaration(VariableDeclaration {
            variables,
            value: value.map(Box::new),
        })
    }

    pub fn assign(names: &[&str], value: Expression) -> Self {
        Statement::Assignment(Assignment {
            variable_names: names
                .iter()
                .map(|n| Identifier {
                    name: n.to_string(),
                })
                .collect(),
            value: Box::new(value),
        })
    }

    pub fn expr(expression: Expression) -> Self {
        Statement::ExpressionStatement(ExpressionStatement { expression })
    }

    pub fn if_(condition: Expression, body: Vec<Statement>) -> Self {
        Statement::If(If {
            condition: Box::new(condition),
            body: Block::new(body),
        })
    }
}

/// Parse a program block from its JSON form
pub fn from_json(source: &str) -> serde_json::Result<Block> {
    serde_json::from_str(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_function_definition() {
        let json = r#"{
            "statements": [{
                "kind": "FunctionDefinition",
                "name": "f",
                "parameters": [{ "name": "a", "type": "u256" }],
                "return_variables": [{ "name": "r", "type": "u256" }],
                "body": { "statements": [
                    { "kind": "Assignment",
                      "variable_names": [{ "name": "r" }],
                      "value": { "kind": "Identifier", "name": "a" } },
                    { "kind": "Break" }
                ] }
            }]
        }"#;
        let block = from_json(json).unwrap();
        let Statement::FunctionDefinition(def) = &block.statements[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(def.name, "f");
        assert_eq!(def.parameters, vec![TypedName::new("a", "u256")]);
        assert_eq!(def.body.statements.len(), 2);
        assert_eq!(def.body.statements[1], Statement::Break);
    }

    #[test]
    fn test_parse_literal_defaults_type() {
        let json = r#"{ "kind": "Literal", "literal_kind": "number", "value": "0x10" }"#;
        let expr: Expression = serde_json::from_str(json).unwrap();
        assert_eq!(expr, Expression::number("0x10", ""));
    }

    #[test]
    fn test_json_round_trip_of_call() {
        let expr = Expression::call("eth.getGasLeft", vec![]);
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
