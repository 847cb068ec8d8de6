//! Declarative front panel state.
//!
//! The controller keeps a [`Panel`] describing what should be on screen;
//! the presentation layer draws it and reports presses back as
//! [`PanelEvent`]s. Nothing here touches widgets.

use crate::preset::Preset;


/// User input forwarded from the presentation layer.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum PanelEvent {
    /// A preset button was pressed.
    PresetSelected( usize ),

    /// A page selector button was pressed.
    PageSelected( usize ),
}


/// One preset button on the displayed page.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct PresetSlot {
    pub number: usize,
    pub name: String,
    pub background_color: String,
    pub text_color: String,
    pub column: usize,
    pub row: usize,
    pub pressed: bool,
}


/// One page selector button.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct PageSlot {
    pub index: usize,
    pub label: String,
    pub pressed: bool,
}


/// The two status lines.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct StatusLines {
    pub line1: String,
    pub line2: String,
}


/// Title bar contents.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct TitleBar {
    pub clock: String,
    pub link_quality: Option<u32>,
}


impl TitleBar {
    /// Signal text for the title bar; empty when the quality is unknown.
    pub fn signal_text( &self ) -> String {
        self.link_quality
            .map( |q| format!( "{}%", q ) )
            .unwrap_or_default()
    }
}


/// Everything the presentation layer needs to draw the panel.
#[derive( Debug, Clone, Default )]
pub struct Panel {
    pub status: StatusLines,
    pub title: TitleBar,
    grid: Vec<PresetSlot>,
    pages: Vec<PageSlot>,
    page: usize,
    // Bumped whenever the grid is rebuilt
    generation: u64,
}


impl Panel {
    pub fn grid( &self ) -> &[PresetSlot] {
        &self.grid
    }


    pub fn pages( &self ) -> &[PageSlot] {
        &self.pages
    }


    /// Index of the page whose buttons are in the grid.
    pub fn displayed_page( &self ) -> usize {
        self.page
    }


    /// Number of times the grid has been rebuilt.
    pub fn generation( &self ) -> u64 {
        self.generation
    }


    /// Numbers of the preset buttons currently marked pressed.
    pub fn pressed_presets( &self ) -> Vec<usize> {
        self.grid.iter()
            .filter( |slot| slot.pressed )
            .map( |slot| slot.number )
            .collect()
    }


    /// Indices of the page buttons currently marked pressed.
    pub fn pressed_pages( &self ) -> Vec<usize> {
        self.pages.iter()
            .filter( |slot| slot.pressed )
            .map( |slot| slot.index )
            .collect()
    }


    pub( crate ) fn set_page_count( &mut self, count: usize ) {
        self.pages = ( 0..count )
            .map( |index| PageSlot {
                index,
                label: ( index + 1 ).to_string(),
                pressed: false,
            })
            .collect();
    }


    /// Replaces the grid with the buttons for `presets`, laid out row by row.
    pub( crate ) fn render_page( &mut self, page: usize, presets: &[Preset], columns: usize ) {
        let columns = columns.max( 1 );
        self.grid = presets.iter()
            .enumerate()
            .map( |( i, preset )| PresetSlot {
                number: preset.number,
                name: preset.name.clone(),
                background_color: preset.background_color.clone(),
                text_color: preset.text_color.clone(),
                column: i % columns,
                row: i / columns,
                pressed: false,
            })
            .collect();
        self.page = page;
        self.generation += 1;
    }


    /// Marks exactly the button for `current` as pressed, if it is on the grid.
    pub( crate ) fn highlight_preset( &mut self, current: Option<usize> ) {
        for slot in &mut self.grid {
            slot.pressed = Some( slot.number ) == current;
        }
    }


    /// Marks exactly the selector for `page` as pressed.
    pub( crate ) fn highlight_page( &mut self, page: usize ) {
        for slot in &mut self.pages {
            slot.pressed = slot.index == page;
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn preset( number: usize ) -> Preset {
        Preset {
            number,
            name: format!( "P{}", number ),
            url: format!( "http://{}", number ),
            background_color: "red".into(),
            text_color: "black".into(),
        }
    }


    #[test]
    fn test_render_positions_row_major() {
        let presets: Vec<Preset> = ( 4..9 ).map( preset ).collect();
        let mut panel = Panel::default();
        panel.render_page( 1, &presets, 2 );

        let positions: Vec<( usize, usize, usize )> = panel.grid().iter()
            .map( |s| ( s.number, s.column, s.row ) )
            .collect();
        assert_eq!( positions, [ ( 4, 0, 0 ), ( 5, 1, 0 ), ( 6, 0, 1 ), ( 7, 1, 1 ), ( 8, 0, 2 ) ] );
        assert_eq!( panel.displayed_page(), 1 );
        assert_eq!( panel.generation(), 1 );
    }


    #[test]
    fn test_highlight_is_exclusive() {
        let presets: Vec<Preset> = ( 0..4 ).map( preset ).collect();
        let mut panel = Panel::default();
        panel.render_page( 0, &presets, 2 );

        panel.highlight_preset( Some( 2 ) );
        assert_eq!( panel.pressed_presets(), [ 2 ] );
        panel.highlight_preset( Some( 1 ) );
        assert_eq!( panel.pressed_presets(), [ 1 ] );
        panel.highlight_preset( Some( 9 ) );
        assert!( panel.pressed_presets().is_empty() );
    }


    #[test]
    fn test_page_labels_are_one_based() {
        let mut panel = Panel::default();
        panel.set_page_count( 3 );
        panel.highlight_page( 2 );

        let labels: Vec<&str> = panel.pages().iter().map( |p| p.label.as_str() ).collect();
        assert_eq!( labels, [ "1", "2", "3" ] );
        assert_eq!( panel.pressed_pages(), [ 2 ] );
    }


    #[test]
    fn test_signal_text() {
        let mut title = TitleBar::default();
        assert_eq!( title.signal_text(), "" );
        title.link_quality = Some( 50 );
        assert_eq!( title.signal_text(), "50%" );
    }
}
