//! Splits the preset catalog into fixed-size pages.

use std::ops::Range;

use crate::config::ConfigError;


/// Page arithmetic over a catalog of `total` presets.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct Pager {
    total: usize,
    page_size: usize,
}


impl Pager {
    /// Creates a pager. A zero page size or an empty catalog is a
    /// configuration error.
    pub fn new( total: usize, page_size: usize ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err( ConfigError::ZeroPageSize );
        }
        if total == 0 {
            return Err( ConfigError::EmptyCatalog );
        }

        Ok( Self { total, page_size } )
    }


    /// Number of pages, `ceil(total / page_size)`.
    pub fn page_count( &self ) -> usize {
        self.total.div_ceil( self.page_size )
    }


    /// Number of the first preset on `page`.
    pub fn first_index_of( &self, page: usize ) -> usize {
        page * self.page_size
    }


    /// Number of presets on `page`; zero past the last page.
    pub fn count_on( &self, page: usize ) -> usize {
        self.page_size.min( self.total.saturating_sub( self.first_index_of( page ) ) )
    }


    /// Page holding preset `number`.
    pub fn page_of( &self, number: usize ) -> usize {
        number / self.page_size
    }


    /// Preset numbers shown on `page`.
    pub fn range_of( &self, page: usize ) -> Range<usize> {
        let first = self.first_index_of( page );
        first..first + self.count_on( page )
    }


    pub fn contains_page( &self, page: usize ) -> bool {
        page < self.page_count()
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_eight_presets_four_per_page() {
        let pager = Pager::new( 8, 4 ).unwrap();
        assert_eq!( pager.page_count(), 2 );
        assert_eq!( pager.range_of( 0 ), 0..4 );
        assert_eq!( pager.range_of( 1 ), 4..8 );
        assert_eq!( pager.page_of( 5 ), 1 );
    }


    #[test]
    fn test_partial_last_page() {
        let pager = Pager::new( 10, 4 ).unwrap();
        assert_eq!( pager.page_count(), 3 );
        assert_eq!( pager.first_index_of( 2 ), 8 );
        assert_eq!( pager.count_on( 2 ), 2 );
        assert_eq!( pager.count_on( 3 ), 0 );
    }


    #[test]
    fn test_single_page_when_size_exceeds_total() {
        let pager = Pager::new( 3, 8 ).unwrap();
        assert_eq!( pager.page_count(), 1 );
        assert_eq!( pager.count_on( 0 ), 3 );
        assert!( pager.contains_page( 0 ) );
        assert!( !pager.contains_page( 1 ) );
    }


    #[test]
    fn test_zero_page_size_fails_fast() {
        assert_eq!( Pager::new( 8, 0 ), Err( ConfigError::ZeroPageSize ) );
    }


    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!( Pager::new( 0, 4 ), Err( ConfigError::EmptyCatalog ) );
    }


    #[test]
    fn test_page_invariants_hold_for_small_sizes() {
        for total in 1..=40 {
            for page_size in 1..=12 {
                let pager = Pager::new( total, page_size ).unwrap();

                let sum: usize = ( 0..pager.page_count() ).map( |p| pager.count_on( p ) ).sum();
                assert_eq!( sum, total, "total={} page_size={}", total, page_size );

                let mut last_page = 0;
                for n in 0..total {
                    let page = pager.page_of( n );
                    assert!( page >= last_page );
                    last_page = page;

                    let first = pager.first_index_of( page );
                    assert!( first <= n && n < first + pager.count_on( page ) );
                }
            }
        }
    }
}
