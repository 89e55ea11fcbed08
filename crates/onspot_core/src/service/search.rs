//! In-memory participant search for the desk lookup view.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test over all eight fields.
//! - A blank query matches every participant.
//! - Input order is preserved.

use crate::model::participant::Participant;

/// Returns whether `participant` matches a lowercase, trimmed `needle`.
pub fn participant_matches(participant: &Participant, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    participant
        .columns()
        .join(" ")
        .to_lowercase()
        .contains(needle)
}

/// Filters `participants` down to those matching `query`.
pub fn filter_participants(participants: Vec<Participant>, query: &str) -> Vec<Participant> {
    let needle = query.trim().to_lowercase();
    participants
        .into_iter()
        .filter(|participant| participant_matches(participant, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_participants;
    use crate::model::participant::Participant;

    fn participant(uid: &str, name: &str, email: &str) -> Participant {
        Participant {
            uid: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            college: "Mepco Schlenk Engineering College (Autonomous)".to_string(),
            dept: "Civil Engineering".to_string(),
            year: "B.E".to_string(),
            created_at: "2026-02-01 09:00:00".to_string(),
        }
    }

    #[test]
    fn matches_any_field_case_insensitively() {
        let rows = vec![
            participant("ONSPOT-1", "Kavya", "kavya@gmail.com"),
            participant("ONSPOT-2", "Arun", "arun@gmail.com"),
        ];

        let by_name = filter_participants(rows.clone(), "KAV");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].uid, "ONSPOT-1");

        let by_uid = filter_participants(rows.clone(), "onspot-2");
        assert_eq!(by_uid.len(), 1);
        assert_eq!(by_uid[0].name, "Arun");

        let by_college = filter_participants(rows, "mepco");
        assert_eq!(by_college.len(), 2);
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let rows = vec![
            participant("ONSPOT-2", "Arun", "arun@gmail.com"),
            participant("ONSPOT-1", "Kavya", "kavya@gmail.com"),
        ];
        let result = filter_participants(rows.clone(), "   ");
        assert_eq!(result, rows);
    }
}
