//! League business logic: result parsing and tallying.

mod results;
mod tally;

pub use results::{is_result_report, parse_match_results, winner_from_line, RESULTS_PER_REPORT};
pub use tally::{render_results, tally_results, Tally, TallyEntry};
