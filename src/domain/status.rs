//! Claim status.

text_enum! {
    /// Lifecycle label of a claim. Only `Completed` drives the success reports.
    #[derive(Default)]
    ClaimStatus {
        #[default]
        Pending => "Pending",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}
