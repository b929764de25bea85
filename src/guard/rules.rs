//! Pattern rules for the command guard.
//!
//! Classification is pure: everything environmental arrives through
//! [`GuardContext`], so the same command and context always produce the
//! same verdict.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static DROP_STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdrop\s+(database|table)\b").expect("drop statement pattern is valid")
});

/// Nesting limit for `sh -c` / `eval` scripts.
const MAX_SCRIPT_DEPTH: usize = 4;

/// Facts about the environment the caller gathered before classifying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardContext {
    pub current_branch: Option<String>,
    /// Whether a feature store exists in the working tree.
    pub store_present: bool,
    pub home_dir: Option<PathBuf>,
    pub protected_branches: Vec<String>,
}

impl GuardContext {
    fn on_protected_branch(&self) -> bool {
        self.current_branch
            .as_ref()
            .is_some_and(|branch| self.protected_branches.iter().any(|p| p == branch))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRule {
    DestructiveDelete,
    ForcePush,
    DropStatement,
    ProtectedBranchCommit,
}

impl GuardRule {
    /// Evaluation order. A rule is checked against every segment before the
    /// next rule is tried.
    pub const ORDER: [GuardRule; 4] = [
        GuardRule::DestructiveDelete,
        GuardRule::ForcePush,
        GuardRule::DropStatement,
        GuardRule::ProtectedBranchCommit,
    ];

    /// The one-line rejection reason when `invocation` trips this rule.
    fn check(self, invocation: &Invocation, ctx: &GuardContext) -> Option<String> {
        match self {
            GuardRule::DestructiveDelete => (invocation.program() == Some("rm")
                && is_destructive_delete(invocation.args(), ctx))
            .then(|| {
                "recursive force delete of the filesystem root or a home directory; \
                 name the specific subdirectory to remove instead"
                    .to_string()
            }),
            GuardRule::ForcePush => match invocation.git_subcommand() {
                Some(("push", rest)) if is_force_push(rest) => Some(
                    "force push rewrites remote history; use `git push --force-with-lease` instead"
                        .to_string(),
                ),
                _ => None,
            },
            GuardRule::DropStatement => DROP_STATEMENT_RE.is_match(&invocation.text).then(|| {
                "DROP DATABASE/TABLE destroys data; run a reviewed migration instead".to_string()
            }),
            GuardRule::ProtectedBranchCommit => match invocation.git_subcommand() {
                Some(("commit", _)) if ctx.store_present && ctx.on_protected_branch() => {
                    let branch = ctx.current_branch.as_deref().unwrap_or_default();
                    Some(format!(
                        "direct commit to protected branch `{branch}`; \
                         create a feature branch with `git switch -c <name>` first"
                    ))
                }
                _ => None,
            },
        }
    }
}

impl fmt::Display for GuardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuardRule::DestructiveDelete => "destructive-delete",
            GuardRule::ForcePush => "force-push",
            GuardRule::DropStatement => "drop-statement",
            GuardRule::ProtectedBranchCommit => "protected-branch-commit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Allow,
    Reject { rule: GuardRule, reason: String },
}

impl GuardVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardVerdict::Allow)
    }

    /// 0 allow, 2 reject.
    pub fn exit_code(&self) -> u8 {
        match self {
            GuardVerdict::Allow => 0,
            GuardVerdict::Reject { .. } => 2,
        }
    }
}

/// Classify a command line.
///
/// Rules are tried in [`GuardRule::ORDER`]; each one is checked against
/// every segment, including scripts handed to `sh -c` or `eval`, before the
/// next rule is tried.
pub fn guard_command(command: &str, ctx: &GuardContext) -> GuardVerdict {
    let mut invocations = Vec::new();
    collect_invocations(command, 0, &mut invocations);

    for rule in GuardRule::ORDER {
        if let Some(reason) = invocations.iter().find_map(|inv| rule.check(inv, ctx)) {
            return GuardVerdict::Reject { rule, reason };
        }
    }
    GuardVerdict::Allow
}

/// One segment of a command line, with wrapper commands peeled off.
#[derive(Debug)]
struct Invocation {
    /// The segment as written, for text-level rules.
    text: String,
    /// Program first, then its arguments.
    words: Vec<String>,
}

impl Invocation {
    fn program(&self) -> Option<&str> {
        self.words.first().map(|program| basename(program))
    }

    fn args(&self) -> &[String] {
        self.words.get(1..).unwrap_or_default()
    }

    fn git_subcommand(&self) -> Option<(&str, &[String])> {
        if self.program() == Some("git") {
            git_subcommand(self.args())
        } else {
            None
        }
    }
}

fn collect_invocations(command: &str, depth: usize, out: &mut Vec<Invocation>) {
    for segment in split_segments(command) {
        let tokens = tokenize(segment);
        let words = strip_wrappers(&tokens).to_vec();

        if depth < MAX_SCRIPT_DEPTH {
            if let Some(script) = inner_script(&words) {
                collect_invocations(&script, depth + 1, out);
            }
        }

        out.push(Invocation {
            text: segment.to_string(),
            words,
        });
    }
}

/// Split on `;`, `&&`, `||`, `|`, `&`, newlines, backticks and parentheses
/// outside of quotes.
pub fn split_segments(command: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in command.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                ';' | '&' | '|' | '\n' | '`' | '(' | ')' => {
                    segments.push(&command[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    segments.push(&command[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Whitespace-separated words; quotes group words and are removed.
fn tokenize(segment: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in segment.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Options taking a value and the number of positional arguments a wrapper
/// consumes before the command it runs.
fn wrapper_shape(program: &str) -> Option<(&'static [&'static str], usize)> {
    let shape: (&'static [&'static str], usize) = match program {
        "sudo" => (&["-u", "-g", "-U", "-C", "-h", "-p", "-r", "-t", "-D"], 0),
        "doas" => (&["-u", "-C"], 0),
        "env" => (&["-u", "-C", "--unset", "--chdir"], 0),
        "exec" => (&["-a"], 0),
        "command" | "builtin" | "nohup" | "time" => (&[], 0),
        "nice" => (&["-n", "--adjustment"], 0),
        "ionice" => (&["-c", "-n", "-p"], 0),
        "stdbuf" => (&["-i", "-o", "-e"], 0),
        "timeout" => (&["-s", "-k", "--signal", "--kill-after"], 1),
        "xargs" => (&["-I", "-L", "-n", "-P", "-d", "-E", "-s", "-a"], 0),
        _ => return None,
    };
    Some(shape)
}

/// The words left once leading `NAME=value` assignments and wrapper
/// commands such as `sudo`, `timeout 5` or `xargs` are removed.
fn strip_wrappers(tokens: &[String]) -> &[String] {
    let mut rest = tokens;
    loop {
        while rest.first().is_some_and(|t| is_assignment(t)) {
            rest = &rest[1..];
        }

        let Some((value_options, positionals)) =
            rest.first().and_then(|program| wrapper_shape(basename(program)))
        else {
            return rest;
        };

        let mut i = 1;
        while let Some(option) = rest.get(i).filter(|t| t.starts_with('-')) {
            if option == "--" {
                i += 1;
                break;
            }
            i += if value_options.iter().any(|v| *v == option.as_str()) { 2 } else { 1 };
        }
        rest = rest.get(i + positionals..).unwrap_or_default();
    }
}

/// The script run by `sh -c <script>` (any common shell, flags may be
/// clustered as in `bash -lc`) or by `eval`.
fn inner_script(words: &[String]) -> Option<String> {
    let (program, args) = words.split_first()?;
    match basename(program) {
        "eval" => Some(args.join(" ")),
        "sh" | "bash" | "zsh" | "dash" | "ksh" => {
            let flag = args.iter().position(|arg| {
                arg.strip_prefix('-')
                    .is_some_and(|flags| !flags.starts_with('-') && flags.contains('c'))
            })?;
            args.get(flag + 1).cloned()
        }
        _ => None,
    }
}

fn is_assignment(token: &str) -> bool {
    token.split_once('=').is_some_and(|(name, _)| {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn basename(program: &str) -> &str {
    program.rsplit('/').next().unwrap_or(program)
}

fn is_destructive_delete(args: &[String], ctx: &GuardContext) -> bool {
    let mut recursive = false;
    let mut force = false;
    let mut targets = Vec::new();
    let mut options_done = false;

    for arg in args {
        if options_done || !arg.starts_with('-') || arg == "-" {
            targets.push(arg.as_str());
        } else if arg == "--" {
            options_done = true;
        } else if let Some(long) = arg.strip_prefix("--") {
            match long {
                "recursive" => recursive = true,
                "force" => force = true,
                _ => {}
            }
        } else {
            recursive |= arg.contains(['r', 'R']);
            force |= arg.contains('f');
        }
    }

    recursive
        && force
        && targets
            .iter()
            .any(|target| is_root_target(target) || is_home_target(target, ctx))
}

fn is_root_target(target: &str) -> bool {
    let base = target.strip_suffix("/*").unwrap_or(target);
    base.chars().all(|c| c == '/')
}

fn is_home_target(target: &str, ctx: &GuardContext) -> bool {
    let base = target.strip_suffix("/*").unwrap_or(target);
    let base = base.trim_end_matches('/');

    if matches!(base, "~" | "$HOME" | "${HOME}" | "/root") {
        return true;
    }

    if let Some(home) = ctx.home_dir.as_ref().and_then(|h| h.to_str()) {
        if !home.is_empty() && base == home.trim_end_matches('/') {
            return true;
        }
    }

    ["/home/", "/Users/"].iter().any(|prefix| {
        base.strip_prefix(prefix)
            .is_some_and(|user| !user.is_empty() && !user.contains('/'))
    })
}

/// The git subcommand and its arguments, skipping global options.
fn git_subcommand(args: &[String]) -> Option<(&str, &[String])> {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-C" | "-c" | "--git-dir" | "--work-tree" | "--namespace" => i += 2,
            opt if opt.starts_with('-') => i += 1,
            sub => return Some((sub, &args[i + 1..])),
        }
    }
    None
}

fn is_force_push(args: &[String]) -> bool {
    args.iter().any(|arg| {
        if let Some(long) = arg.strip_prefix("--") {
            long == "force"
        } else if let Some(short) = arg.strip_prefix('-') {
            !short.is_empty() && short.chars().all(|c| c.is_ascii_alphabetic()) && short.contains('f')
        } else {
            false
        }
    })
}
