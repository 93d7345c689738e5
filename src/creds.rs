//! Credential token management: encoding, durable storage, and the operator prompt.

use base64::engine::{general_purpose::STANDARD, Engine as _};
use std::cell::RefCell;
use std::io::{self, Write as _};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CredsError {
    #[error("Token storage I/O error")]
    Storage(#[source] io::Error),

    #[error("Operator prompt I/O error")]
    Prompt(#[source] io::Error),
}

/// Opaque credential token sent with each authenticated request.
///
/// The token is the standard base64 encoding of `username:password`, as required for `Basic`
/// authorization. The encoding is reversible. It provides no confidentiality beyond
/// transport-layer encryption, so TLS at the endpoint is a deployment requirement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token(String);

impl Token {
    /// Encode a username and password into the opaque wire form.
    pub fn encode(username: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{username}:{password}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_stored(raw: String) -> Self {
        Self(raw)
    }
}

/// Durable storage for a single credential token.
///
/// An explicit store object instead of process-global state, so it can be mocked in tests and
/// scoped per session.
pub trait CredentialStore {
    /// Absence means "not yet authenticated".
    fn get(&self) -> Result<Option<Token>, CredsError>;

    fn set(&self, token: &Token) -> Result<(), CredsError>;

    /// Must tolerate an already-absent token.
    fn clear(&self) -> Result<(), CredsError>;
}

/// One token in one file, under the user cache directory by default.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Token>, CredsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Token::from_stored(raw.to_string())))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CredsError::Storage(err)),
        }
    }

    fn set(&self, token: &Token) -> Result<(), CredsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(CredsError::Storage)?;
        }

        std::fs::write(&self.path, token.as_str()).map_err(CredsError::Storage)
    }

    fn clear(&self) -> Result<(), CredsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CredsError::Storage(err)),
        }
    }
}

/// Session-scoped token storage. Useful for tests and for callers that do not want a durable
/// token on disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RefCell<Option<Token>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Token>, CredsError> {
        Ok(self.token.borrow().clone())
    }

    fn set(&self, token: &Token) -> Result<(), CredsError> {
        *self.token.borrow_mut() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredsError> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}

/// The operator's input channel: blocking text prompts and notifications.
pub trait OperatorPrompt {
    fn read_line(&mut self, msg: &str) -> Result<String, CredsError>;

    fn notify(&mut self, msg: &str);
}

/// Prompt on stdout, read from stdin. Input is trimmed of surrounding whitespace.
#[derive(Debug, Default)]
pub struct TermPrompt;

impl OperatorPrompt for TermPrompt {
    fn read_line(&mut self, msg: &str) -> Result<String, CredsError> {
        print!("{msg}");
        io::stdout().flush().map_err(CredsError::Prompt)?;

        let mut line = String::new();
        io::stdin().read_line(&mut line).map_err(CredsError::Prompt)?;

        Ok(line.trim().to_string())
    }

    fn notify(&mut self, msg: &str) {
        println!("{msg}");
    }
}

/// Return the stored token, or prompt the operator for a new one.
///
/// A cached hit returns immediately with no prompting and no writes. On a fresh entry the token
/// is persisted before it is returned. Empty username or password input notifies the operator
/// and yields `None`; the caller must treat that as non-retryable for the current cycle.
pub fn obtain<S, P>(store: &S, prompt: &mut P) -> Result<Option<Token>, CredsError>
where
    S: CredentialStore + ?Sized,
    P: OperatorPrompt + ?Sized,
{
    if let Some(token) = store.get()? {
        debug!("Using stored credential token");
        return Ok(Some(token));
    }

    let username = prompt.read_line("Enter username: ")?;
    let password = prompt.read_line("Enter password: ")?;
    if username.is_empty() || password.is_empty() {
        prompt.notify("Credentials are required to access data.");
        return Ok(None);
    }

    let token = Token::encode(&username, &password);
    store.set(&token)?;

    Ok(Some(token))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::collections::VecDeque;

    pub(crate) struct ScriptedPrompt {
        pub(crate) inputs: VecDeque<&'static str>,
        pub(crate) notices: Vec<String>,
    }

    impl ScriptedPrompt {
        pub(crate) fn new(inputs: &[&'static str]) -> Self {
            Self {
                inputs: inputs.iter().copied().collect(),
                notices: Vec::new(),
            }
        }
    }

    impl OperatorPrompt for ScriptedPrompt {
        fn read_line(&mut self, _msg: &str) -> Result<String, CredsError> {
            Ok(self.inputs.pop_front().expect("unexpected prompt").to_string())
        }

        fn notify(&mut self, msg: &str) {
            self.notices.push(msg.to_string());
        }
    }

    #[test]
    fn test_token_encoding() {
        assert_eq!(Token::encode("admin", "password").as_str(), "YWRtaW46cGFzc3dvcmQ=");
    }

    #[test]
    fn test_cached_hit_never_prompts() {
        let store = MemoryCredentialStore::default();
        store.set(&Token::encode("admin", "password")).unwrap();

        // No scripted inputs: any prompt would panic.
        let mut prompt = ScriptedPrompt::new(&[]);
        let token = obtain(&store, &mut prompt).unwrap();

        assert_eq!(token, Some(Token::encode("admin", "password")));
        assert!(prompt.notices.is_empty());
    }

    #[test]
    fn test_fresh_entry_is_persisted() {
        let store = MemoryCredentialStore::default();
        let mut prompt = ScriptedPrompt::new(&["alice", "secret"]);

        let token = obtain(&store, &mut prompt).unwrap().unwrap();

        assert_eq!(token, Token::encode("alice", "secret"));
        assert_eq!(store.get().unwrap(), Some(token));
        assert!(prompt.notices.is_empty());
    }

    #[test]
    fn test_empty_input_yields_none() {
        let store = MemoryCredentialStore::default();
        let mut prompt = ScriptedPrompt::new(&["alice", ""]);

        let token = obtain(&store, &mut prompt).unwrap();

        assert_eq!(token, None);
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(prompt.notices, vec!["Credentials are required to access data."]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("momoviz-token-{}", std::process::id()));
        let store = FileCredentialStore::new(path);
        let token = Token::encode("admin", "password");

        // Absent file reads as "not yet authenticated".
        assert_eq!(store.get().unwrap(), None);
        assert!(store.clear().is_ok());

        store.set(&token).unwrap();
        assert_eq!(store.get().unwrap(), Some(token));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
