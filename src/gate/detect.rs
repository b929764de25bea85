//! Default gate commands detected from project manifests.

use std::fmt;
use std::path::Path;

/// A toolchain recognized from a manifest in the project root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedLanguage {
    TypeScript,
    JavaScript,
    Rust,
    Go,
    Python,
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedLanguage::TypeScript => write!(f, "TypeScript"),
            DetectedLanguage::JavaScript => write!(f, "JavaScript"),
            DetectedLanguage::Rust => write!(f, "Rust"),
            DetectedLanguage::Go => write!(f, "Go"),
            DetectedLanguage::Python => write!(f, "Python"),
        }
    }
}

impl DetectedLanguage {
    /// Every check for this toolchain, cheapest (static) first.
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            DetectedLanguage::TypeScript => &["npx tsc --noEmit"],
            DetectedLanguage::JavaScript => &["npm run lint --if-present", "npm test"],
            DetectedLanguage::Rust => &["cargo check", "cargo test"],
            DetectedLanguage::Go => &["go vet ./...", "go test ./..."],
            DetectedLanguage::Python => &["python -m compileall -q .", "python -m pytest"],
        }
    }

    /// The static check alone.
    pub fn fast_command(&self) -> &'static str {
        self.commands()[0]
    }
}

/// Detect toolchains by manifest file:
/// - TypeScript: tsconfig.json
/// - JavaScript (npm scripts): package.json
/// - Rust: Cargo.toml
/// - Go: go.mod
/// - Python: pyproject.toml
pub fn detect_project_languages(root: &Path) -> Vec<DetectedLanguage> {
    [
        ("tsconfig.json", DetectedLanguage::TypeScript),
        ("package.json", DetectedLanguage::JavaScript),
        ("Cargo.toml", DetectedLanguage::Rust),
        ("go.mod", DetectedLanguage::Go),
        ("pyproject.toml", DetectedLanguage::Python),
    ]
    .into_iter()
    .filter(|(manifest, _)| root.join(manifest).exists())
    .map(|(_, language)| language)
    .collect()
}

/// Fast gate: the first command per detected toolchain.
pub fn default_fast_commands(root: &Path) -> Vec<String> {
    detect_project_languages(root)
        .iter()
        .map(|language| language.fast_command().to_string())
        .collect()
}

/// Full gate: every command per detected toolchain, duplicates dropped.
pub fn default_full_commands(root: &Path) -> Vec<String> {
    let mut commands: Vec<String> = Vec::new();
    for language in detect_project_languages(root) {
        for command in language.commands() {
            if !commands.iter().any(|c| c == command) {
                commands.push(command.to_string());
            }
        }
    }
    commands
}
