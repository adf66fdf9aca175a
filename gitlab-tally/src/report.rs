//! Plain-text rendering of a finished tally.

use gitlab_tally_core::tally::AuthorTally;

/// One block per author in email order, then the grand totals.
pub fn render_report(tally: &AuthorTally) -> String {
    let mut out = String::from("--- Combined Results ---\n");
    for (author, counts) in tally {
        out.push_str(&format!(
            "Author: {author}\nAdded Lines: {}\nRemoved Lines: {}\nTotal Lines: {}\n---\n",
            counts.added, counts.removed, counts.total
        ));
    }
    let totals = tally.totals();
    out.push_str(&format!(
        "Total added: {}\nTotal removed: {}\nTotal: {}\n",
        totals.added, totals.removed, totals.total
    ));
    out
}
