pub mod event_log;
pub mod question;
pub mod quiz;
pub mod reporting;
pub mod student;
pub mod submission;

pub use event_log::{EventEntry, LogEventRequest};
pub use question::{OptionInput, Question, QuestionInput, QuestionOption};
pub use quiz::{CheckCodeRequest, CheckCodeResponse, CreateQuizRequest, Quiz, UpdateQuizRequest};
pub use reporting::ResultRow;
pub use student::{RegisterRequest, RegisterResponse, Student, UpdateStudentRequest};
pub use submission::{
    AnswerRecord, JoinRequest, JoinResponse, SelectionMap, SubmitRequest, SubmitResponse,
    Submission,
};
