//! Keyboard input handling for the panel.
//!
//! Touch is the primary input; keys are a fallback for attached keyboards
//! and for running the panel in an ordinary terminal.

use crossterm::event::KeyCode;
use mira_core::panel::PresetSlot;
use mira_core::PanelEvent;


/// What a key press asks for.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum KeyAction {
    Panel( PanelEvent ),
    Quit,
}


/// Maps a key to an action given the displayed grid and page.
///
/// `1`-`9` press the nth button on the page, arrows and page keys switch page.
pub fn map_key( code: KeyCode, grid: &[PresetSlot], page: usize, page_count: usize ) -> Option<KeyAction> {
    match code {
        KeyCode::Char( 'q' ) | KeyCode::Esc => Some( KeyAction::Quit ),

        KeyCode::Char( c @ '1'..='9' ) => {
            let position = c as usize - '1' as usize;
            grid.get( position )
                .map( |slot| KeyAction::Panel( PanelEvent::PresetSelected( slot.number ) ) )
        }

        KeyCode::Right | KeyCode::PageDown => {
            ( page + 1 < page_count )
                .then( || KeyAction::Panel( PanelEvent::PageSelected( page + 1 ) ) )
        }

        KeyCode::Left | KeyCode::PageUp => {
            page.checked_sub( 1 )
                .map( |prev| KeyAction::Panel( PanelEvent::PageSelected( prev ) ) )
        }

        _ => None,
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn grid( numbers: std::ops::Range<usize> ) -> Vec<PresetSlot> {
        numbers.enumerate()
            .map( |( i, number )| PresetSlot {
                number,
                name: format!( "Radio {}", number + 1 ),
                background_color: "red".into(),
                text_color: "black".into(),
                column: i % 2,
                row: i / 2,
                pressed: false,
            })
            .collect()
    }


    #[test]
    fn test_digit_selects_slot_on_page() {
        let slots = grid( 4..8 );
        assert_eq!(
            map_key( KeyCode::Char( '2' ), &slots, 1, 2 ),
            Some( KeyAction::Panel( PanelEvent::PresetSelected( 5 ) ) )
        );
        assert_eq!( map_key( KeyCode::Char( '5' ), &slots, 1, 2 ), None );
    }


    #[test]
    fn test_page_keys_stay_in_range() {
        let slots = grid( 0..4 );
        assert_eq!(
            map_key( KeyCode::Right, &slots, 0, 2 ),
            Some( KeyAction::Panel( PanelEvent::PageSelected( 1 ) ) )
        );
        assert_eq!( map_key( KeyCode::PageDown, &slots, 1, 2 ), None );
        assert_eq!( map_key( KeyCode::Left, &slots, 0, 2 ), None );
        assert_eq!(
            map_key( KeyCode::PageUp, &slots, 1, 2 ),
            Some( KeyAction::Panel( PanelEvent::PageSelected( 0 ) ) )
        );
    }


    #[test]
    fn test_quit_keys() {
        assert_eq!( map_key( KeyCode::Char( 'q' ), &[], 0, 1 ), Some( KeyAction::Quit ) );
        assert_eq!( map_key( KeyCode::Esc, &[], 0, 1 ), Some( KeyAction::Quit ) );
        assert_eq!( map_key( KeyCode::Char( 'x' ), &[], 0, 1 ), None );
    }
}
