use std::fmt;

/// Errors raised while parsing a regex or resolving grammar symbols.
///
/// Always fatal: the generator produces no partial `LanguageData` once one
/// of these is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A regex string could not be parsed; `offset` is the byte offset of
    /// the first character that could not be accounted for.
    InvalidRegex { pattern: String, offset: usize, reason: String },
    /// A rule body named an identifier that is neither a declared token nor
    /// a declared nonterminal.
    UndefinedSymbol { name: String },
    /// A token name was declared twice, or a nonterminal shares a name with
    /// a token.
    DuplicateSymbol { name: String },
    /// No nonterminal was designated as the start symbol (empty rule list).
    NoStartSymbol,
    /// The lexer's subset construction produced more states than the
    /// configured ceiling.
    LexerTooLarge { limit: usize },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarError::InvalidRegex { pattern, offset, reason } => write!(
                f,
                "invalid regex \"{}\" at offset {}: {}",
                pattern, offset, reason
            ),
            GrammarError::UndefinedSymbol { name } => {
                write!(f, "undefined symbol \"{}\"", name)
            }
            GrammarError::DuplicateSymbol { name } => {
                write!(f, "duplicate symbol \"{}\"", name)
            }
            GrammarError::NoStartSymbol => write!(f, "grammar has no rules; no start symbol"),
            GrammarError::LexerTooLarge { limit } => {
                write!(f, "lexer too large: exceeded {} DFA states", limit)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// A shift/reduce or reduce/reduce conflict, reported against the
/// human-readable nonterminal names of the colliding productions rather
/// than their internal numeric ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarConflict {
    pub state: usize,
    pub kind: ConflictKind,
    /// Colliding nonterminal names, de-duplicated, in declaration order.
    pub nonterminals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for GrammarConflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(
            f,
            "{} conflict in state {}: involving {}",
            kind,
            self.state,
            self.nonterminals.join(", ")
        )
    }
}

impl std::error::Error for GrammarConflict {}

/// An invariant the implementation believes it maintains was violated.
/// These are bugs in this crate, never user errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalError(pub String);

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "internal error: {}", self.0)
    }
}

impl std::error::Error for InternalError {}

/// The single error type returned by every stage of the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    Grammar(GrammarError),
    Conflict(Vec<GrammarConflict>),
    Internal(InternalError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoreError::Grammar(e) => write!(f, "{}", e),
            CoreError::Conflict(conflicts) => {
                for (i, c) in conflicts.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
            CoreError::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<GrammarError> for CoreError {
    fn from(e: GrammarError) -> Self {
        CoreError::Grammar(e)
    }
}

impl From<InternalError> for CoreError {
    fn from(e: InternalError) -> Self {
        CoreError::Internal(e)
    }
}

impl From<Vec<GrammarConflict>> for CoreError {
    fn from(e: Vec<GrammarConflict>) -> Self {
        CoreError::Conflict(e)
    }
}
