//! Shared conversation context mutated by tools and handoff hooks.

/// State carried across one customer conversation.
///
/// Starts empty and is filled in by tools and handoff hooks as the
/// conversation progresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerContext {
    /// Name of the passenger, when known.
    pub passenger_name: Option<String>,
    /// Booking confirmation number.
    pub confirmation_number: Option<String>,
    /// Seat assignment, e.g. "23A".
    pub seat_number: Option<String>,
    /// Flight number, e.g. "FLT-412". Assigned when the conversation is
    /// handed to seat booking.
    pub flight_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_starts_empty() {
        let context = CustomerContext::default();
        assert_eq!(context.passenger_name, None);
        assert_eq!(context.confirmation_number, None);
        assert_eq!(context.seat_number, None);
        assert_eq!(context.flight_number, None);
    }
}
