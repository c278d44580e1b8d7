//! Subprocess-backed collaborators.
//!
//! Each invocation spawns the configured program, writes one JSON request to its stdin,
//! closes it and parses one JSON response from its stdout. Anything the program prints
//! to stderr is only surfaced when it exits unsuccessfully.

use super::collaborators::{
    AtomMapper, CollaboratorError, Forcefield, ForcefieldLoader, LegOutput, LegRequest,
    LegRunner, MappingConfig,
};
use crate::core::models::atom_core::AtomCore;
use crate::core::models::compound::Compound;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, trace};

/// A program plus its fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace; the first word is the program.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    fn invoke<Req, Resp>(&self, request: &Req) -> Result<Resp, CollaboratorError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let program = self.program.clone();
        let payload = serde_json::to_vec(request).map_err(|source| CollaboratorError::Protocol {
            program: program.clone(),
            source,
        })?;

        debug!(program = %self.program, args = ?self.args, bytes = payload.len(), "Spawning collaborator");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CollaboratorError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| CollaboratorError::Io {
            program: program.clone(),
            source: std::io::Error::other("child stdin was not captured"),
        })?;
        let writer = thread::spawn(move || stdin.write_all(&payload));

        let output = child
            .wait_with_output()
            .map_err(|source| CollaboratorError::Io {
                program: program.clone(),
                source,
            })?;
        let written = writer.join();

        if !output.status.success() {
            return Err(CollaboratorError::Exit {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match written {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(CollaboratorError::Io { program, source }),
            Err(_) => {
                return Err(CollaboratorError::Failed(format!(
                    "stdin writer for '{program}' panicked"
                )));
            }
        }

        trace!(program = %self.program, stdout = %String::from_utf8_lossy(&output.stdout), "Collaborator output");
        serde_json::from_slice(&output.stdout)
            .map_err(|source| CollaboratorError::Protocol { program, source })
    }
}

#[derive(Serialize)]
struct MappingRequest<'a> {
    compound_a: &'a Compound,
    compound_b: &'a Compound,
    config: &'a MappingConfig,
}

/// Atom mapper backed by an external program.
///
/// The response is a JSON array of candidate cores, best first, each an array of
/// `[index_a, index_b]` pairs.
#[derive(Debug, Clone)]
pub struct CommandAtomMapper {
    command: CommandSpec,
}

impl CommandAtomMapper {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl AtomMapper for CommandAtomMapper {
    fn map_atoms(
        &self,
        a: &Compound,
        b: &Compound,
        config: &MappingConfig,
    ) -> Result<Vec<AtomCore>, CollaboratorError> {
        self.command.invoke(&MappingRequest {
            compound_a: a,
            compound_b: b,
            config,
        })
    }
}

/// Leg runner backed by an external program.
///
/// The request is the serialized [`LegRequest`]; the response is a [`LegOutput`] object.
#[derive(Debug, Clone)]
pub struct CommandLegRunner {
    command: CommandSpec,
}

impl CommandLegRunner {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl LegRunner for CommandLegRunner {
    fn run_leg(&self, request: &LegRequest<'_>) -> Result<LegOutput, CollaboratorError> {
        self.command.invoke(request)
    }
}

/// Resolves a forcefield identifier that is either a file path or a bare name.
///
/// Anything that looks like a path (absolute, or containing a separator) must exist.
/// A bare name that happens to match a file in the working directory is resolved to
/// it; otherwise it is passed through for the leg runner to interpret.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileForcefieldLoader;

impl ForcefieldLoader for FileForcefieldLoader {
    fn load(&self, identifier: &str) -> Result<Forcefield, CollaboratorError> {
        if identifier.trim().is_empty() {
            return Err(CollaboratorError::Failed(
                "forcefield identifier is empty".to_string(),
            ));
        }

        let path = Path::new(identifier);
        let looks_like_path = path.is_absolute() || identifier.contains(['/', '\\']);
        if looks_like_path && !path.is_file() {
            return Err(CollaboratorError::Failed(format!(
                "forcefield file does not exist: {identifier}"
            )));
        }

        Ok(Forcefield {
            identifier: identifier.to_string(),
            path: path.is_file().then(|| path.to_path_buf()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_arguments() {
        let spec = CommandSpec::parse("  python3 map.py --fast ").unwrap();
        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["map.py", "--fast"]);
        assert_eq!(CommandSpec::parse("   "), None);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mapper = CommandAtomMapper::new(CommandSpec::new("fepflow-no-such-program", vec![]));
        let a = Compound::new("a", "C", 1);
        let err = mapper
            .map_atoms(&a, &a, &MappingConfig::default())
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Spawn { .. }));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> CommandSpec {
        CommandSpec::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[cfg(unix)]
    #[test]
    fn mapper_reads_ranked_cores_from_stdout() {
        let mapper = CommandAtomMapper::new(shell(
            r#"cat > /dev/null; echo '[[[0,0],[1,2]],[[0,1]]]'"#,
        ));
        let a = Compound::new("a", "CC", 2);
        let b = Compound::new("b", "CCC", 3);

        let cores = mapper.map_atoms(&a, &b, &MappingConfig::default()).unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].pairs(), &[(0, 0), (1, 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn mapper_request_carries_both_compounds() {
        let mapper = CommandAtomMapper::new(shell(
            r#"input=$(cat); case "$input" in *'"compound_b":{"name":"b"'*) echo '[]' ;; *) exit 1 ;; esac"#,
        ));
        let a = Compound::new("a", "CC", 2);
        let b = Compound::new("b", "CCC", 3);
        assert!(mapper.map_atoms(&a, &b, &MappingConfig::default()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_stderr() {
        let mapper = CommandAtomMapper::new(shell("cat > /dev/null; echo boom >&2; exit 3"));
        let a = Compound::new("a", "C", 1);
        let err = mapper
            .map_atoms(&a, &a, &MappingConfig::default())
            .unwrap_err();
        match err {
            CollaboratorError::Exit { stderr, status, .. } => {
                assert_eq!(stderr, "boom");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn garbage_output_is_a_protocol_error() {
        let mapper = CommandAtomMapper::new(shell("cat > /dev/null; echo not-json"));
        let a = Compound::new("a", "C", 1);
        let err = mapper
            .map_atoms(&a, &a, &MappingConfig::default())
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Protocol { .. }));
    }

    #[test]
    fn bare_forcefield_name_is_passed_through() {
        let ff = FileForcefieldLoader.load("smirnoff_2_2_0_ccc").unwrap();
        assert_eq!(ff.identifier, "smirnoff_2_2_0_ccc");
        assert_eq!(ff.path, None);
    }

    #[test]
    fn forcefield_path_must_exist() {
        let err = FileForcefieldLoader.load("/nonexistent/ff.py").unwrap_err();
        assert!(matches!(err, CollaboratorError::Failed(_)));

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ff.py");
        std::fs::write(&file, "# ff").unwrap();
        let ff = FileForcefieldLoader.load(file.to_str().unwrap()).unwrap();
        assert_eq!(ff.path.as_deref(), Some(file.as_path()));
    }
}
