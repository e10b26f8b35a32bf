//! The airline support team: agent wiring, handoff hooks and icons.

use rand::Rng;

use crate::agent::{Agent, CustomerContext, Handoff, Team, ToolSpec};
use crate::config::{AgentPrompts, HANDOFF_PROMPT_PREFIX};
use crate::error::Result;

/// Agent names, also used as handoff targets and display labels.
pub const TRIAGE: &str = "Triage Agent";
pub const FAQ: &str = "FAQ Agent";
pub const SEAT_BOOKING: &str = "Seat Booking Agent";

/// Welcome line shown when a chat session opens.
pub const WELCOME_MESSAGE: &str =
    "Welcome to Airline Customer Service! How can I help you today?";

/// Build the customer service team: triage routes to the FAQ and seat
/// booking specialists, each of which can route back.
pub fn support_team(prompts: &AgentPrompts) -> Result<Team> {
    let faq = Agent::new(
        FAQ,
        "A helpful agent that can answer questions about the airline.",
        with_handoff_prefix(&prompts.faq),
    )
    .with_tools(vec![ToolSpec::FaqLookup])
    .with_handoffs(vec![Handoff::to(TRIAGE)]);

    let seat_booking = Agent::new(
        SEAT_BOOKING,
        "A helpful agent that can update a seat on a flight.",
        with_handoff_prefix(&prompts.seat_booking),
    )
    .with_tools(vec![ToolSpec::UpdateSeat])
    .with_handoffs(vec![Handoff::to(TRIAGE)]);

    let triage = Agent::new(
        TRIAGE,
        "A triage agent that can delegate a customer's request to the appropriate agent.",
        with_handoff_prefix(&prompts.triage),
    )
    .with_handoffs(vec![
        Handoff::to(FAQ),
        Handoff::to(SEAT_BOOKING).with_hook(assign_flight_number),
    ]);

    Team::new(vec![triage, faq, seat_booking], TRIAGE)
}

/// Compose the shared handoff preamble with an agent's own instructions.
fn with_handoff_prefix(instructions: &str) -> String {
    format!("{}\n\n{}", HANDOFF_PROMPT_PREFIX, instructions)
}

/// Stamp a random flight number on the conversation when triage hands a
/// customer to seat booking.
fn assign_flight_number(context: &mut CustomerContext) {
    let number = rand::thread_rng().gen_range(100..1000);
    context.flight_number = Some(format!("FLT-{}", number));
}

/// Icon shown next to an agent's messages in the web chat.
pub fn agent_icon(agent_name: &str) -> &'static str {
    match agent_name {
        TRIAGE => "🎯",
        FAQ => "📚",
        SEAT_BOOKING => "💺",
        _ => "✨",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_wiring() {
        let team = support_team(&AgentPrompts::default()).unwrap();
        assert_eq!(team.entry().name, TRIAGE);
        assert_eq!(team.agent_names(), vec![TRIAGE, FAQ, SEAT_BOOKING]);

        let triage = team.get(TRIAGE).unwrap();
        let targets: Vec<&str> = triage
            .handoffs
            .iter()
            .map(|handoff| handoff.target.as_str())
            .collect();
        assert_eq!(targets, vec![FAQ, SEAT_BOOKING]);

        // Specialists route back to triage.
        assert!(team
            .get(FAQ)
            .unwrap()
            .find_handoff("transfer_to_triage_agent")
            .is_some());
        assert!(team
            .get(SEAT_BOOKING)
            .unwrap()
            .find_handoff("transfer_to_triage_agent")
            .is_some());
    }

    #[test]
    fn test_seat_booking_handoff_carries_the_hook() {
        let team = support_team(&AgentPrompts::default()).unwrap();
        let triage = team.get(TRIAGE).unwrap();
        let handoff = triage
            .find_handoff("transfer_to_seat_booking_agent")
            .unwrap();
        assert!(handoff.on_handoff.is_some());

        let mut context = CustomerContext::default();
        handoff.on_handoff.unwrap()(&mut context);
        let flight = context.flight_number.unwrap();
        let digits: u32 = flight.strip_prefix("FLT-").unwrap().parse().unwrap();
        assert!((100..1000).contains(&digits));
    }

    #[test]
    fn test_faq_handoff_has_no_hook() {
        let team = support_team(&AgentPrompts::default()).unwrap();
        let triage = team.get(TRIAGE).unwrap();
        let handoff = triage.find_handoff("transfer_to_faq_agent").unwrap();
        assert!(handoff.on_handoff.is_none());
    }

    #[test]
    fn test_instructions_start_with_the_handoff_preamble() {
        let team = support_team(&AgentPrompts::default()).unwrap();
        for name in [TRIAGE, FAQ, SEAT_BOOKING] {
            let agent = team.get(name).unwrap();
            assert!(agent.instructions.starts_with("# System context"));
        }
    }

    #[test]
    fn test_agent_icons() {
        assert_eq!(agent_icon(TRIAGE), "🎯");
        assert_eq!(agent_icon(FAQ), "📚");
        assert_eq!(agent_icon(SEAT_BOOKING), "💺");
        assert_eq!(agent_icon("Weather Agent"), "✨");
    }
}
