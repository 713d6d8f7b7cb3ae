pub mod formatter;
pub mod report;

pub use formatter::{
    format_result_detail, format_result_table, format_score, format_tsv, should_use_colors,
    Verdict,
};
pub use report::{to_json, write_json_report, TieringSummary};
