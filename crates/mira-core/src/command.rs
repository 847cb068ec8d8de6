//! Player commands and "now playing" parsing.
//!
//! The external player is driven with a small fixed command set. Commands
//! know their own argument lists so every player backend invokes them the
//! same way.

use std::fmt;


/// A command understood by the external player client.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum PlayerCommand {
    /// Empty the play queue.
    Clear,

    /// Append a stream to the queue.
    Add { url: String },

    /// Start playback of the queue.
    Play,

    /// Ask what is currently playing.
    Current,
}


impl PlayerCommand {
    /// Returns the argument list passed to the player client.
    pub fn args( &self ) -> Vec<&str> {
        match self {
            PlayerCommand::Clear => vec![ "clear" ],
            PlayerCommand::Add { url } => vec![ "add", url.as_str() ],
            PlayerCommand::Play => vec![ "play" ],
            PlayerCommand::Current => vec![ "current" ],
        }
    }
}


impl fmt::Display for PlayerCommand {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        write!( f, "{}", self.args().join( " " ) )
    }
}


/// Extracts the status text from the player's "current" output.
///
/// Text after the first `:` is used, trimmed; without a colon the whole
/// line is used as is. Empty output means nothing is playing.
pub fn parse_now_playing( output: &str ) -> String {
    let line = output.trim_end_matches( [ '\r', '\n' ] );
    if line.trim().is_empty() {
        return String::new();
    }

    match line.split_once( ':' ) {
        Some(( _, title )) => title.trim().to_string(),
        None => line.to_string(),
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_args() {
        assert_eq!( PlayerCommand::Clear.args(), [ "clear" ] );
        assert_eq!(
            PlayerCommand::Add { url: "http://x/stream".into() }.args(),
            [ "add", "http://x/stream" ]
        );
        assert_eq!( PlayerCommand::Play.args(), [ "play" ] );
        assert_eq!( PlayerCommand::Current.args(), [ "current" ] );
    }


    #[test]
    fn test_display() {
        assert_eq!( PlayerCommand::Add { url: "http://x".into() }.to_string(), "add http://x" );
    }


    #[test]
    fn test_now_playing_after_colon() {
        assert_eq!( parse_now_playing( "Artist: Track Title" ), "Track Title" );
    }


    #[test]
    fn test_now_playing_without_colon() {
        assert_eq!( parse_now_playing( "NoColonHere" ), "NoColonHere" );
    }


    #[test]
    fn test_now_playing_splits_on_first_colon_only() {
        assert_eq!(
            parse_now_playing( "Radio Swiss Pop: Band: Song (Live)\n" ),
            "Band: Song (Live)"
        );
    }


    #[test]
    fn test_now_playing_strips_trailing_newline() {
        assert_eq!( parse_now_playing( "Station Name\n" ), "Station Name" );
    }


    #[test]
    fn test_now_playing_empty() {
        assert_eq!( parse_now_playing( "" ), "" );
        assert_eq!( parse_now_playing( "\n" ), "" );
    }
}
