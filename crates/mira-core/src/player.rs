//! External player control
//!
//! Playback is delegated to an `mpc` client process. Each command is a
//! blocking invocation whose standard output is captured.

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

use crate::command::PlayerCommand;
use crate::config::PlayerConfig;


/// Errors that can occur while invoking the player client.
#[derive( Debug, Error )]
pub enum PlayerError {
    #[error( "Failed to run {program}: {source}" )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error( "'{command}' exited with {status}: {stderr}" )]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}


/// Something that can carry out player commands.
pub trait PlayerControl {
    /// Runs a command and returns its textual output.
    fn run( &mut self, command: &PlayerCommand ) -> Result<String, PlayerError>;
}


/// Player control through the `mpc` command line client.
#[derive( Debug, Clone )]
pub struct Mpc {
    program: PathBuf,
}


impl Mpc {
    pub fn new( program: impl Into<PathBuf> ) -> Self {
        Self { program: program.into() }
    }


    pub fn from_config( config: &PlayerConfig ) -> Self {
        Self::new( &config.mpc_path )
    }
}


impl PlayerControl for Mpc {
    fn run( &mut self, command: &PlayerCommand ) -> Result<String, PlayerError> {
        tracing::debug!( "mpc {}", command );

        let output = Command::new( &self.program )
            .args( command.args() )
            .output()
            .map_err( |source| PlayerError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err( PlayerError::Failed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy( &output.stderr ).trim().to_string(),
            });
        }

        Ok( String::from_utf8_lossy( &output.stdout ).into_owned() )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_missing_binary_is_spawn_error() {
        let mut mpc = Mpc::new( "/nonexistent/bin/mpc" );
        let result = mpc.run( &PlayerCommand::Play );
        assert!( matches!( result, Err( PlayerError::Spawn { .. } ) ) );
    }


    #[cfg( unix )]
    #[test]
    fn test_captures_stdout() {
        // `echo` prints its arguments, standing in for the player client
        let mut mpc = Mpc::new( "echo" );
        let output = mpc.run( &PlayerCommand::Add { url: "http://x/stream".into() } ).unwrap();
        assert_eq!( output, "add http://x/stream\n" );
    }


    #[cfg( unix )]
    #[test]
    fn test_non_zero_exit_is_failure() {
        let mut mpc = Mpc::new( "false" );
        let result = mpc.run( &PlayerCommand::Current );
        assert!( matches!( result, Err( PlayerError::Failed { .. } ) ) );
    }
}
