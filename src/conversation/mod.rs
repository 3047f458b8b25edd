pub mod extract;

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::planning::{GeneratedPlanning, PlanningRequest, Preferences, Subject, TimeSlot};

pub use extract::{parse_schedule_from_message, parse_subjects_from_message};

const PLANNING_KEYWORDS: [&str; 6] = ["planning", "planifier", "révision", "examens", "organiser", "programme"];

const CANNED_RESPONSES: [(&str, &str); 6] = [
    ("procrastination", "Je comprends ! 😊 La procrastination touche 95% des étudiants. Veux-tu qu'on commence par une micro-session de 5 minutes ? C'est plus facile que de se lancer dans 2h d'études !"),
    ("quick_session", "⚡ Excellent choix ! 5 minutes c'est le temps parfait pour se remettre en route. Choisis une matière et on démarre un mini-exercice !"),
    ("motivation", "💪 Tu sais quoi ? Le fait que tu demandes de l'aide montre déjà ta motivation ! Quel est ton objectif principal cette semaine ?"),
    ("test bouton", "🚀 Super ! Le chat fonctionne parfaitement ! Tu peux maintenant me poser tes vraies questions d'étudiant."),
    ("bonjour", "👋 Salut ! Je suis ton assistant personnel pour t'aider dans tes études. Comment puis-je t'accompagner aujourd'hui ?"),
    ("aide", "🎯 Je peux t'aider avec plein de choses ! Planifier tes révisions, te motiver, créer des sessions express... Dis-moi ce qui te préoccupe !"),
];

const FALLBACK_RESPONSE: &str = "🤔 Intéressant ! Peux-tu me donner plus de détails ? Je suis là pour t'aider avec tes études !";

/// Where a client is in the planning conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStep {
    #[default]
    Idle,
    CollectingSubjects,
    CollectingSchedule,
    Ready,
}

/// Per-client conversation state. Passed in and returned with every message;
/// never shared between clients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningConversation {
    pub step: PlanningStep,
    pub subjects: Vec<Subject>,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub planning_step: PlanningStep,
    /// Set once both subjects and slots are collected
    pub planning_data: Option<PlanningRequest>,
}

pub fn is_planning_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    PLANNING_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn canned_response(message: &str) -> String {
    let lower = message.to_lowercase();
    let response = CANNED_RESPONSES
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map_or(FALLBACK_RESPONSE, |(_, value)| *value);
    format!("{}\n\n💡 Tu peux me demander de planifier tes révisions quand tu veux !", response)
}

impl PlanningConversation {
    pub fn is_active(&self) -> bool {
        self.step != PlanningStep::Idle
    }

    /// Advances the conversation by one user message
    pub fn handle_message(self, message: &str, today: NaiveDate) -> (PlanningConversation, ChatReply) {
        match self.step {
            PlanningStep::Idle | PlanningStep::Ready => {
                if is_planning_request(message) {
                    let next = PlanningConversation {
                        step: PlanningStep::CollectingSubjects,
                        ..Default::default()
                    };
                    let reply = ChatReply {
                        message: "🎯 Parfait ! Je vais créer ton planning personnalisé !\n\n\
                            📚 **Étape 1/3 : Tes matières**\n\n\
                            Dis-moi quelles matières tu étudies et quand sont tes examens.\n\n\
                            *Format : \"Mathématiques examen 20 janvier, Histoire examen 25 janvier\"*\n\n\
                            Ou liste-les une par une ! 😊"
                            .to_string(),
                        planning_step: next.step,
                        planning_data: None,
                    };
                    (next, reply)
                } else {
                    let reply = ChatReply {
                        message: canned_response(message),
                        planning_step: self.step,
                        planning_data: None,
                    };
                    (self, reply)
                }
            }
            PlanningStep::CollectingSubjects => {
                let subjects = parse_subjects_from_message(message, today);
                let listing: Vec<String> = subjects
                    .iter()
                    .map(|s| format!("• {} (examen {})", s.name, s.exam_date))
                    .collect();
                let reply = ChatReply {
                    message: format!(
                        "✅ Super ! J'ai noté {} matières :\n{}\n\n\
                        ⏰ **Étape 2/3 : Tes créneaux libres**\n\n\
                        Maintenant, dis-moi quand tu es disponible pour étudier.\n\n\
                        *Exemple : \"Lundi 14h-16h, Mardi 9h-11h, Mercredi 18h-20h\"*",
                        subjects.len(),
                        listing.join("\n")
                    ),
                    planning_step: PlanningStep::CollectingSchedule,
                    planning_data: None,
                };
                let next = PlanningConversation {
                    step: PlanningStep::CollectingSchedule,
                    subjects,
                    available_slots: Vec::new(),
                };
                (next, reply)
            }
            PlanningStep::CollectingSchedule => {
                let available_slots = parse_schedule_from_message(message);
                let next = PlanningConversation {
                    step: PlanningStep::Ready,
                    subjects: self.subjects,
                    available_slots,
                };
                let reply = ChatReply {
                    message: format!(
                        "🎉 Excellent ! J'ai tous les éléments :\n\n\
                        📚 **{} matières** configurées\n\
                        ⏰ **{} créneaux** disponibles\n\n\
                        🤖 **Génération de ton planning optimal en cours...**\n\n\
                        *L'algorithme analyse tes priorités et optimise la répartition...*",
                        next.subjects.len(),
                        next.available_slots.len()
                    ),
                    planning_step: PlanningStep::Ready,
                    planning_data: Some(PlanningRequest {
                        subjects: next.subjects.clone(),
                        available_slots: next.available_slots.clone(),
                        preferences: Preferences::default(),
                    }),
                };
                (next, reply)
            }
        }
    }
}

/// Chat message announcing a freshly generated planning
pub fn planning_summary_message(planning: &GeneratedPlanning) -> String {
    format!(
        "🎉 **Planning généré avec succès !**\n\n\
        ✨ **{} sessions** optimisées créées\n\
        📚 **{} matières** réparties intelligemment\n\
        ⏰ **{:.1}h** de travail planifiées\n\n\
        📱 **Ton planning est maintenant visible dans l'onglet Planning !**\n\n\
        🎯 L'algorithme a priorisé tes examens les plus proches et optimisé la répartition !",
        planning.sessions.len(),
        planning.subjects.len(),
        planning.total_hours
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_idle_small_talk_stays_idle() {
        let (state, reply) = PlanningConversation::default().handle_message("Bonjour !", today());
        assert_eq!(state.step, PlanningStep::Idle);
        assert!(reply.message.starts_with("👋 Salut"));
        assert!(reply.planning_data.is_none());

        let (_, reply) = state.handle_message("euh", today());
        assert!(reply.message.starts_with("🤔"));
    }

    #[test]
    fn test_full_flow_reaches_ready() {
        let state = PlanningConversation::default();
        assert!(!state.is_active());

        let (state, reply) = state.handle_message("Peux-tu m'aider à organiser mes révisions ?", today());
        assert_eq!(state.step, PlanningStep::CollectingSubjects);
        assert_eq!(reply.planning_step, PlanningStep::CollectingSubjects);
        assert!(state.is_active());

        let (state, reply) = state.handle_message("Math 2025-01-20, Histoire 2025-01-25", today());
        assert_eq!(state.step, PlanningStep::CollectingSchedule);
        assert_eq!(state.subjects.len(), 2);
        assert!(reply.message.contains("J'ai noté 2 matières"));
        assert!(reply.message.contains("• Math (examen 2025-01-20)"));

        let (state, reply) = state.handle_message("Lundi 14h-16h, Mardi 9h-11h", today());
        assert_eq!(state.step, PlanningStep::Ready);
        let data = reply.planning_data.expect("planning data when ready");
        assert_eq!(data.subjects.len(), 2);
        assert_eq!(data.available_slots.len(), 2);
        assert_eq!(data.preferences, Preferences::default());
    }

    #[test]
    fn test_ready_restarts_on_new_planning_request() {
        let state = PlanningConversation {
            step: PlanningStep::Ready,
            ..Default::default()
        };
        let (state, _) = state.handle_message("nouveau planning", today());
        assert_eq!(state.step, PlanningStep::CollectingSubjects);
        assert!(state.subjects.is_empty());
    }

    #[test]
    fn test_states_are_independent() {
        let alice = PlanningConversation::default();
        let bob = PlanningConversation::default();
        let (alice, _) = alice.handle_message("planning", today());
        assert_eq!(alice.step, PlanningStep::CollectingSubjects);
        assert_eq!(bob.step, PlanningStep::Idle);
    }

    #[test]
    fn test_step_serializes_snake_case() {
        let json = serde_json::to_string(&PlanningStep::CollectingSubjects).unwrap();
        assert_eq!(json, "\"collecting_subjects\"");
    }
}
