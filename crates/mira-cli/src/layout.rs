//! Screen layout and hit testing for the front panel.
//!
//! Splits the panel into its bands and the grid into button cells, so the
//! same geometry is used for drawing and for mapping touches back to buttons.

use ratatui::layout::{ Constraint, Flex, Layout, Rect };


/// Width of one page selector button, in cells.
pub const PAGE_BUTTON_WIDTH: u16 = 7;

/// Height of the page selector row.
pub const PAGE_ROW_HEIGHT: u16 = 3;


/// The horizontal bands of the panel, top to bottom.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct PanelAreas {
    pub title: Rect,
    pub status: Rect,
    pub spacing: Option<Rect>,
    pub grid: Rect,
    pub pages: Option<Rect>,
}


/// Splits the panel area. The spacing band and page row are only present
/// when they have something to show.
pub fn split( area: Rect, spacing_height: u16, show_pages: bool ) -> PanelAreas {
    let mut constraints = vec![
        Constraint::Length( 1 ),  // Title bar
        Constraint::Length( 2 ),  // Status lines
    ];
    if spacing_height > 0 {
        constraints.push( Constraint::Length( spacing_height ) );
    }
    constraints.push( Constraint::Min( 0 ) );
    if show_pages {
        constraints.push( Constraint::Length( PAGE_ROW_HEIGHT ) );
    }

    let chunks = Layout::vertical( constraints ).split( area );

    let mut next = 2;
    let spacing = if spacing_height > 0 {
        next += 1;
        Some( chunks[ 2 ] )
    } else {
        None
    };
    let grid = chunks[ next ];
    let pages = show_pages.then( || chunks[ next + 1 ] );

    PanelAreas {
        title: chunks[ 0 ],
        status: chunks[ 1 ],
        spacing,
        grid,
        pages,
    }
}


/// Splits the grid area into `columns` x `rows` cells, row by row.
pub fn grid_cells( area: Rect, columns: usize, rows: usize ) -> Vec<Rect> {
    let columns = columns.max( 1 ) as u32;
    let rows = rows.max( 1 ) as u32;

    let row_areas = Layout::vertical( ( 0..rows ).map( |_| Constraint::Ratio( 1, rows ) ) ).split( area );

    row_areas.iter()
        .flat_map( |row| {
            Layout::horizontal( ( 0..columns ).map( |_| Constraint::Ratio( 1, columns ) ) )
                .split( *row )
                .to_vec()
        })
        .collect()
}


/// Cell of the grid slot at (`column`, `row`).
pub fn cell_index( column: usize, row: usize, columns: usize ) -> usize {
    row * columns.max( 1 ) + column
}


/// Splits the page selector row into `count` fixed-width buttons, left aligned.
pub fn page_cells( area: Rect, count: usize ) -> Vec<Rect> {
    Layout::horizontal( vec![ Constraint::Length( PAGE_BUTTON_WIDTH ); count ] )
        .flex( Flex::Start )
        .split( area )
        .to_vec()
}


/// Returns the index of the first cell containing the point.
pub fn hit_test( cells: &[Rect], column: u16, row: u16 ) -> Option<usize> {
    cells.iter().position( |cell| {
        column >= cell.x && column < cell.right() && row >= cell.y && row < cell.bottom()
    })
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_split_with_spacing_and_pages() {
        let areas = split( Rect::new( 0, 0, 80, 24 ), 1, true );

        assert_eq!( areas.title, Rect::new( 0, 0, 80, 1 ) );
        assert_eq!( areas.status, Rect::new( 0, 1, 80, 2 ) );
        assert_eq!( areas.spacing, Some( Rect::new( 0, 3, 80, 1 ) ) );
        assert_eq!( areas.grid, Rect::new( 0, 4, 80, 17 ) );
        assert_eq!( areas.pages, Some( Rect::new( 0, 21, 80, 3 ) ) );
    }


    #[test]
    fn test_split_without_optional_bands() {
        let areas = split( Rect::new( 0, 0, 80, 24 ), 0, false );

        assert_eq!( areas.spacing, None );
        assert_eq!( areas.pages, None );
        assert_eq!( areas.grid, Rect::new( 0, 3, 80, 21 ) );
    }


    #[test]
    fn test_grid_cells_row_major() {
        let cells = grid_cells( Rect::new( 0, 0, 80, 20 ), 2, 4 );

        assert_eq!( cells.len(), 8 );
        assert_eq!( cells[ 0 ], Rect::new( 0, 0, 40, 5 ) );
        assert_eq!( cells[ 1 ], Rect::new( 40, 0, 40, 5 ) );
        assert_eq!( cells[ 2 ], Rect::new( 0, 5, 40, 5 ) );
        assert_eq!( cells[ cell_index( 1, 3, 2 ) ], Rect::new( 40, 15, 40, 5 ) );
    }


    #[test]
    fn test_hit_test() {
        let cells = grid_cells( Rect::new( 0, 4, 80, 20 ), 2, 4 );

        assert_eq!( hit_test( &cells, 1, 4 ), Some( 0 ) );
        assert_eq!( hit_test( &cells, 45, 11 ), Some( 3 ) );
        assert_eq!( hit_test( &cells, 79, 23 ), Some( 7 ) );
        assert_eq!( hit_test( &cells, 10, 2 ), None );
        assert_eq!( hit_test( &cells, 80, 10 ), None );
    }


    #[test]
    fn test_page_cells() {
        let cells = page_cells( Rect::new( 0, 21, 80, 3 ), 3 );

        assert_eq!( cells.len(), 3 );
        assert_eq!( cells[ 0 ], Rect::new( 0, 21, PAGE_BUTTON_WIDTH, 3 ) );
        assert_eq!( cells[ 2 ].x, 2 * PAGE_BUTTON_WIDTH );
        assert_eq!( hit_test( &cells, 8, 22 ), Some( 1 ) );
    }
}
