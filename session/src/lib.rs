pub mod method;
pub mod session;

pub use method::SelectionMethod;
pub use session::{
    Feedback, FeedbackOutcome, Recommendation, RecommendationSession, SessionError,
};
