//! Objective definitions and the two scripted story parts.
//!
//! An objective is a small state machine: inactive until activated, then
//! active until completed, and completion is terminal. The story scripts
//! here are data; all sequencing logic lives in the objective manager.

use crate::buildings::BuildingRole;
use crate::config::OBJECTIVE_NOTIFICATION_SECS;

/// One step of a story part.
#[derive(Debug, Clone)]
pub struct GameObjective {
    /// Unique within the whole story; dispatch and binding key off it.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Shown when the player is within interaction range of the target.
    pub prompt: String,
    /// Tile the player must reach. Bound after generation; `None` only
    /// before binding runs.
    pub target: Option<(usize, usize)>,
    pub active: bool,
    pub completed: bool,
    notification_timer: f32,
}

impl GameObjective {
    pub fn new(id: &str, title: &str, description: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            prompt: prompt.to_string(),
            target: None,
            active: false,
            completed: false,
            notification_timer: 0.0,
        }
    }

    /// Activation starts the on-screen announcement timer. Completed
    /// objectives stay completed.
    pub fn activate(&mut self) {
        if self.completed {
            return;
        }
        self.active = true;
        self.notification_timer = OBJECTIVE_NOTIFICATION_SECS;
    }

    pub fn complete(&mut self) {
        self.completed = true;
        self.active = false;
    }

    pub fn update(&mut self, dt: f32) {
        if self.notification_timer > 0.0 {
            self.notification_timer = (self.notification_timer - dt).max(0.0);
        }
    }

    /// Whether the "new objective" toast should still be on screen.
    pub fn notification_visible(&self) -> bool {
        self.active && self.notification_timer > 0.0
    }
}

/// The two scripted chapters. One manager runs both in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryPart {
    Employment,
    Housing,
}

impl StoryPart {
    pub fn next(self) -> Option<StoryPart> {
        match self {
            StoryPart::Employment => Some(StoryPart::Housing),
            StoryPart::Housing => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StoryPart::Employment => "Part 1: A Job in the City",
            StoryPart::Housing => "Part 2: A Place of Your Own",
        }
    }

    /// The full objective script for this part, in play order.
    pub fn objectives(self) -> Vec<GameObjective> {
        match self {
            StoryPart::Employment => vec![
                GameObjective::new(
                    "wake_up",
                    "A New Morning",
                    "You just moved to the city. Time to find your footing.",
                    "Press E to get up",
                ),
                GameObjective::new(
                    "visit_school",
                    "Visit the School",
                    "The community school runs a job-readiness program.",
                    "Press E to enter the school",
                ),
                GameObjective::new(
                    "school_quiz",
                    "Skills Assessment",
                    "Take the short assessment so the counselor knows where you stand.",
                    "Press E to start the assessment",
                ),
                GameObjective::new(
                    "collect_documents",
                    "Gather Your Papers",
                    "Sort your documents: the interview needs ID, resume and references.",
                    "Press E to sort your documents",
                ),
                GameObjective::new(
                    "visit_office",
                    "Head Downtown",
                    "The office that posted the opening is downtown.",
                    "Press E to enter the office",
                ),
                GameObjective::new(
                    "job_interview",
                    "The Interview",
                    "Make a good impression. Read the interviewer, pick your answers.",
                    "Press E to begin the interview",
                ),
                GameObjective::new(
                    "first_paycheck",
                    "First Paycheck",
                    "You got the job. Pick up your first pay.",
                    "Press E to collect your pay",
                ),
                GameObjective::new(
                    "grocery_run",
                    "Grocery Run",
                    "An empty fridge won't feed you. Head to the grocery store.",
                    "Press E to enter the store",
                ),
                GameObjective::new(
                    "grocery_shopping",
                    "Shop on a Budget",
                    "Fill the cart without blowing the budget. Staples first.",
                    "Press E to start shopping",
                ),
                GameObjective::new(
                    "return_school",
                    "Back to Class",
                    "The counselor asked you to come back after your first week.",
                    "Press E to enter the school",
                ),
                GameObjective::new(
                    "budget_quiz",
                    "Budgeting Basics",
                    "A short quiz on keeping your spending under your income.",
                    "Press E to start the quiz",
                ),
                GameObjective::new(
                    "day_one_complete",
                    "Rest Up",
                    "A job, groceries, and a plan. Not bad for a first week.",
                    "Press E to end the day",
                ),
            ],
            StoryPart::Housing => vec![
                GameObjective::new(
                    "apartment_search",
                    "Apartment Hunting",
                    "Time to stop couch-surfing. A building nearby has a vacancy.",
                    "Press E to check the listing",
                ),
                GameObjective::new(
                    "apartment_tour",
                    "The Tour",
                    "The landlord shows you around the unit.",
                    "Press E to take the tour",
                ),
                GameObjective::new(
                    "lease_documents",
                    "Lease Paperwork",
                    "Match each document to the right part of the application.",
                    "Press E to fill out the application",
                ),
                GameObjective::new(
                    "rent_negotiation",
                    "Talk Rent",
                    "The asking rent is steep. See what the landlord will agree to.",
                    "Press E to negotiate",
                ),
                GameObjective::new(
                    "visit_bank",
                    "Visit the Bank",
                    "You'll need an account for the deposit and rent payments.",
                    "Press E to enter the bank",
                ),
                GameObjective::new(
                    "open_account",
                    "Open an Account",
                    "Set up a checking account with the teller.",
                    "Press E to talk to the teller",
                ),
                GameObjective::new(
                    "furniture_shopping",
                    "Furnish the Place",
                    "A bed, a table, a lamp. Keep it inside the moving budget.",
                    "Press E to shop for furniture",
                ),
                GameObjective::new(
                    "visit_pizza",
                    "Celebration Dinner",
                    "Keys in hand. Grab a pizza on the way home.",
                    "Press E to order",
                ),
                GameObjective::new(
                    "housewarming",
                    "Housewarming",
                    "Your own place, your own table, your own night in.",
                    "Press E to settle in",
                ),
                GameObjective::new(
                    "story_complete",
                    "Home",
                    "Employed, housed, and solvent. The city is yours now.",
                    "Press E to finish",
                ),
            ],
        }
    }
}

/// Narrative role each objective is bound to. Binding keys off the id so
/// reordering or inserting objectives never shifts targets.
pub fn role_for(id: &str) -> Option<BuildingRole> {
    Some(match id {
        "wake_up" | "collect_documents" | "day_one_complete" => BuildingRole::House,
        "visit_school" | "school_quiz" | "return_school" | "budget_quiz" => BuildingRole::School,
        "visit_office" | "job_interview" | "first_paycheck" => BuildingRole::Office,
        "grocery_run" | "grocery_shopping" => BuildingRole::Grocery,
        "apartment_search" | "apartment_tour" | "lease_documents" | "rent_negotiation"
        | "housewarming" | "story_complete" => BuildingRole::Apartment,
        "visit_bank" | "open_account" => BuildingRole::Bank,
        "furniture_shopping" => BuildingRole::Store,
        "visit_pizza" => BuildingRole::Pizza,
        _ => return None,
    })
}
