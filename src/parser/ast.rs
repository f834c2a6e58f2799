// AST (Abstract Syntax Tree) definitions for the MiniWhile analyzer

/// Source location information for error reporting.
///
/// `line` is 1-based and incremented on each newline. `offset` is the
/// absolute 0-based character index of the token start within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// AST nodes, one variant per grammar production.
///
/// `Number` and `Variable` are the two shapes a `factor` can take.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// `int IDENT = NUMBER ;`
    Declare {
        name: String,
        value: i64,
        location: SourceLocation,
    },
    /// `IDENT = expression ;`
    Assign {
        name: String,
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    Number(i64, SourceLocation),
    Variable(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },

    /// `WHILE ( condition )`
    While {
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    /// `int IDENT == NUMBER`
    Condition {
        name: String,
        value: i64,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::Declare { location, .. } => location,
            AstNode::Assign { location, .. } => location,
            AstNode::Number(_, loc) => loc,
            AstNode::Variable(_, loc) => loc,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::While { location, .. } => location,
            AstNode::Condition { location, .. } => location,
        }
    }
}

/// Top-level program structure:
/// `declarations DO statements ENDDO while_statement ENDWHILE`
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<AstNode>, // Declare nodes
    pub statements: Vec<AstNode>,   // Assign nodes
    pub while_clause: AstNode,      // While node
}
