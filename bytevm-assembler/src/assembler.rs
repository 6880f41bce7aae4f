//! Main assembler logic

use crate::encoder::encode_into;
use crate::error::{AssemblerError, Result};
use crate::lexer::{tokenize, TokenStream};
use crate::parser::{parse_statement, StatementKind};
use bytevm_isa::Executable;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Assembled bytecode plus the label table collected on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub executable: Executable,
    /// Label name -> byte offset of the next instruction
    pub labels: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
enum Input {
    Source(String),
    Tokens(TokenStream),
}

/// Assembler over one source, assembled at most once
#[derive(Debug)]
pub struct Assembler {
    input: Input,
    output: OnceCell<Result<Assembly>>,
}

impl Assembler {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            input: Input::Source(source.into()),
            output: OnceCell::new(),
        }
    }

    /// Assemble a pre-built token stream
    pub fn from_tokens(tokens: TokenStream) -> Self {
        Self {
            input: Input::Tokens(tokens),
            output: OnceCell::new(),
        }
    }

    /// Assemble on first call; later calls return the cached outcome
    pub fn assembly(&self) -> &Result<Assembly> {
        self.output.get_or_init(|| self.run())
    }

    pub fn executable(&self) -> std::result::Result<&Executable, &AssemblerError> {
        self.assembly().as_ref().map(|assembly| &assembly.executable)
    }

    /// Label table, `None` if assembly failed
    pub fn labels(&self) -> Option<&HashMap<String, usize>> {
        self.assembly().as_ref().ok().map(|assembly| &assembly.labels)
    }

    fn run(&self) -> Result<Assembly> {
        let mut tokens = match &self.input {
            Input::Source(source) => tokenize(source)?,
            Input::Tokens(tokens) => tokens.clone(),
        };
        tokens.reset();

        let mut code = Vec::new();
        let mut labels = HashMap::new();

        while let Some(statement) = parse_statement(&mut tokens)? {
            match statement.kind {
                StatementKind::Label(name) => {
                    if labels.contains_key(&name) {
                        return Err(AssemblerError::DuplicateLabel {
                            position: statement.position,
                            name,
                        });
                    }
                    labels.insert(name, code.len());
                }
                StatementKind::Instruction(instr) => encode_into(&instr, &mut code),
            }
        }

        Ok(Assembly {
            executable: Executable::new(code),
            labels,
        })
    }
}

/// Assemble source code into an executable
pub fn assemble(source: &str) -> Result<Executable> {
    Assembler::new(source).assembly().clone().map(|assembly| assembly.executable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Position, SpannedToken, Token};

    #[test]
    fn test_assemble_simple() {
        let source = r#"
            ; Simple test
            PUSH 5
            POP
        "#;

        let exe = assemble(source).unwrap();
        assert_eq!(exe.as_bytes(), &[0xFD, 0x05, 0xFC]);
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble("").unwrap().is_empty());
        assert!(assemble("  ; nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_labels_are_recorded() {
        let assembler = Assembler::new("PUSH 1\nloop:\nPUSH 2\nend:");
        let labels = assembler.labels().unwrap();
        assert_eq!(labels.get("loop"), Some(&2));
        assert_eq!(labels.get("end"), Some(&4));
    }

    #[test]
    fn test_duplicate_label() {
        let err = assemble("a:\nPOP\na:").unwrap_err();
        assert!(matches!(err, AssemblerError::DuplicateLabel { ref name, .. } if name == "a"));
        assert_eq!(err.position(), Position::new(3, 1, 7));
    }

    #[test]
    fn test_result_is_cached() {
        let assembler = Assembler::new("PUSH 1");
        let first = assembler.executable().unwrap() as *const Executable;
        let second = assembler.executable().unwrap() as *const Executable;
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_error_wins() {
        let assembler = Assembler::new("PUSH 1\nFOO 2\nBAR 3");
        let err = assembler.executable().unwrap_err();
        assert!(matches!(err, AssemblerError::UnknownInstruction { ref mnemonic, .. } if mnemonic == "FOO"));
        assert!(assembler.labels().is_none());
    }

    #[test]
    fn test_from_tokens() {
        let tokens = TokenStream::from_tokens(vec![
            SpannedToken::new(Token::Identifier("PUSH".to_string()), Position::START),
            SpannedToken::new(Token::ByteLiteral(9), Position::new(1, 6, 5)),
        ]);
        let assembler = Assembler::from_tokens(tokens);
        assert_eq!(assembler.executable().unwrap().as_bytes(), &[0xFD, 0x09]);
    }
}
