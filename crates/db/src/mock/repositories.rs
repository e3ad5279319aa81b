use std::collections::BTreeMap;

use mockall::mock;
use nest_core::models::evaluation::{EvaluationSubmission, Team};
use nest_core::scoring::Category;
use nest_core::slots::{UnavailableTime, WeeklySchedule};

use crate::models::{
    DbAvailability, DbCourse, DbEvaluationCriteria, DbProfessor, DbReservation, DbScore,
    DbSlotCount, DbUser,
};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn get_user_by_github_id(
            &self,
            github_id: String,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_github_username(
            &self,
            github_username: String,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn find_user_by_github_or_student_id(
            &self,
            github_id: String,
            student_id: String,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub CourseRepo {
        pub async fn find_existing_codes(
            &self,
            codes: Vec<String>,
        ) -> eyre::Result<Vec<String>>;

        pub async fn get_courses_by_professor(
            &self,
            professor_id: String,
        ) -> eyre::Result<Vec<DbCourse>>;

        pub async fn get_professor_name(
            &self,
            professor_id: String,
        ) -> eyre::Result<Option<String>>;
    }
}

mock! {
    pub ProfessorRepo {
        pub async fn get_professor_by_email(
            &self,
            email: String,
        ) -> eyre::Result<Option<DbProfessor>>;

        pub async fn create_professor(
            &self,
            professor_id: String,
            email: String,
            name: Option<String>,
        ) -> eyre::Result<DbProfessor>;
    }
}

mock! {
    pub AvailabilityRepo {
        pub async fn get_availability_by_professor(
            &self,
            professor_id: String,
        ) -> eyre::Result<Option<DbAvailability>>;

        pub async fn upsert_availability(
            &self,
            professor_id: String,
            email: String,
            weekly_schedule: WeeklySchedule,
            unavailable_times: Vec<UnavailableTime>,
        ) -> eyre::Result<DbAvailability>;
    }
}

mock! {
    pub ReservationRepo {
        pub async fn count_reservations_at(
            &self,
            professor_id: String,
            day: String,
            time: String,
        ) -> eyre::Result<i64>;

        pub async fn count_reservations_by_time(
            &self,
            professor_id: String,
            day: String,
        ) -> eyre::Result<Vec<DbSlotCount>>;

        pub async fn insert_reservation(
            &self,
            student_name: String,
            professor_id: String,
            professor_name: String,
            day: String,
            date: String,
            time: String,
            user_id: String,
        ) -> eyre::Result<DbReservation>;
    }
}

mock! {
    pub EvaluationRepo {
        pub async fn get_criteria(
            &self,
            course_code: String,
        ) -> eyre::Result<Option<DbEvaluationCriteria>>;

        pub async fn get_teams(
            &self,
            course_code: String,
        ) -> eyre::Result<Vec<Team>>;

        pub async fn replace_teams(
            &self,
            course_code: String,
            teams: Vec<Team>,
        ) -> eyre::Result<()>;

        pub async fn replace_assignments(
            &self,
            course_code: String,
            assignments: BTreeMap<String, Vec<String>>,
        ) -> eyre::Result<()>;

        pub async fn get_assignments(
            &self,
            course_code: String,
            student_id: String,
        ) -> eyre::Result<Option<Vec<String>>>;

        pub async fn insert_evaluation(
            &self,
            submission: EvaluationSubmission,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ScoreRepo {
        pub async fn get_scores(
            &self,
            student_id: String,
        ) -> eyre::Result<Vec<DbScore>>;

        pub async fn get_points_for_update(
            &self,
            student_id: String,
            category: Category,
        ) -> eyre::Result<Option<f64>>;

        pub async fn upsert_score(
            &self,
            student_id: String,
            category: Category,
            points: f64,
            title: String,
        ) -> eyre::Result<()>;
    }
}
