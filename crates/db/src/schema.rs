use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Table definitions, applied in order. Every statement is idempotent.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            github_id VARCHAR(255) PRIMARY KEY,
            github_username VARCHAR(255) NOT NULL,
            github_name VARCHAR(255) NOT NULL,
            name VARCHAR(255) NOT NULL,
            school_email VARCHAR(255) NOT NULL,
            student_id VARCHAR(64) NOT NULL UNIQUE,
            age INTEGER NOT NULL,
            contact VARCHAR(64) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "courses",
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            code VARCHAR(64) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            professor VARCHAR(255) NOT NULL,
            professor_id VARCHAR(64) NOT NULL,
            day VARCHAR(32) NOT NULL,
            time VARCHAR(32) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "students",
        r#"
        CREATE TABLE IF NOT EXISTS students (
            student_id VARCHAR(64) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            department VARCHAR(255) NOT NULL,
            course_codes TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "professors",
        r#"
        CREATE TABLE IF NOT EXISTS professors (
            professor_id VARCHAR(64) PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "professor_available_times",
        r#"
        CREATE TABLE IF NOT EXISTS professor_available_times (
            id BIGSERIAL PRIMARY KEY,
            professor_id VARCHAR(64) NOT NULL REFERENCES professors(professor_id) ON DELETE CASCADE,
            date VARCHAR(32) NOT NULL,
            times TEXT[] NOT NULL DEFAULT '{}'
        );
        "#,
    ),
    (
        "availability",
        r#"
        CREATE TABLE IF NOT EXISTS availability (
            professor_id VARCHAR(64) PRIMARY KEY REFERENCES professors(professor_id) ON DELETE CASCADE,
            email VARCHAR(255) NOT NULL,
            weekly_schedule JSONB NOT NULL DEFAULT '{}',
            unavailable_times JSONB NOT NULL DEFAULT '[]',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "reservations",
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_name VARCHAR(255) NOT NULL,
            professor_id VARCHAR(64) NOT NULL,
            professor_name VARCHAR(255) NOT NULL,
            day VARCHAR(16) NOT NULL,
            date VARCHAR(16) NOT NULL,
            time VARCHAR(8) NOT NULL,
            user_id VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "evaluation_criteria",
        r#"
        CREATE TABLE IF NOT EXISTS evaluation_criteria (
            course_code VARCHAR(64) PRIMARY KEY,
            criteria TEXT[] NOT NULL DEFAULT '{}',
            max_teams BIGINT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "teams",
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            course_code VARCHAR(64) NOT NULL,
            team_name VARCHAR(255) NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (course_code, team_name)
        );
        "#,
    ),
    (
        "team_members",
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            course_code VARCHAR(64) NOT NULL,
            team_name VARCHAR(255) NOT NULL,
            student_id VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (course_code, student_id),
            FOREIGN KEY (course_code, team_name) REFERENCES teams(course_code, team_name) ON DELETE CASCADE
        );
        "#,
    ),
    (
        "evaluation_assignments",
        r#"
        CREATE TABLE IF NOT EXISTS evaluation_assignments (
            course_code VARCHAR(64) NOT NULL,
            student_id VARCHAR(64) NOT NULL,
            team_names TEXT[] NOT NULL DEFAULT '{}',
            PRIMARY KEY (course_code, student_id)
        );
        "#,
    ),
    (
        "evaluation_results",
        r#"
        CREATE TABLE IF NOT EXISTS evaluation_results (
            id BIGSERIAL PRIMARY KEY,
            course_code VARCHAR(64) NOT NULL,
            team_name VARCHAR(255) NOT NULL,
            evaluator_id VARCHAR(64) NOT NULL,
            scores JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_evaluation_per_team UNIQUE (course_code, team_name, evaluator_id)
        );
        "#,
    ),
    (
        "questions",
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            category VARCHAR(32) NOT NULL,
            custom_categories TEXT[] NOT NULL DEFAULT '{}',
            code TEXT NOT NULL DEFAULT '',
            user_id VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "answers",
        r#"
        CREATE TABLE IF NOT EXISTS answers (
            id BIGSERIAL PRIMARY KEY,
            question_id UUID NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            line_number INTEGER NULL,
            text TEXT NOT NULL,
            user_id VARCHAR(255) NOT NULL,
            user_title VARCHAR(255) NOT NULL,
            resolved BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "scores",
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            student_id VARCHAR(64) NOT NULL,
            category VARCHAR(32) NOT NULL,
            points DOUBLE PRECISION NOT NULL DEFAULT 0,
            title VARCHAR(255) NOT NULL,
            PRIMARY KEY (student_id, category)
        );
        "#,
    ),
    (
        "projects",
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL,
            project_name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            language VARCHAR(64) NOT NULL,
            stars INTEGER NOT NULL,
            updated_at VARCHAR(64) NOT NULL,
            license VARCHAR(255) NULL,
            forks INTEGER NOT NULL,
            watchers INTEGER NOT NULL,
            contributors TEXT NOT NULL,
            is_private BOOLEAN NOT NULL DEFAULT FALSE,
            default_branch VARCHAR(255) NOT NULL,
            repository_url TEXT NOT NULL,
            text_extracted TEXT NOT NULL,
            summary TEXT NOT NULL,
            image_preview_urls TEXT[] NOT NULL DEFAULT '{}',
            generated_image_url TEXT NOT NULL,
            student_id VARCHAR(64) NOT NULL,
            course VARCHAR(255) NOT NULL,
            course_code VARCHAR(64) NOT NULL,
            views BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "project_comments",
        r#"
        CREATE TABLE IF NOT EXISTS project_comments (
            id BIGSERIAL PRIMARY KEY,
            project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            username VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "problems",
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id UUID PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            input_description TEXT NOT NULL,
            output_description TEXT NOT NULL,
            sample_input TEXT NOT NULL,
            sample_output TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "summaries",
        r#"
        CREATE TABLE IF NOT EXISTS summaries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            final_summary TEXT NOT NULL,
            image_data TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_courses_professor_id ON courses(professor_id);",
    "CREATE INDEX IF NOT EXISTS idx_students_course_codes ON students USING GIN (course_codes);",
    "CREATE INDEX IF NOT EXISTS idx_users_github_username ON users(github_username);",
    "CREATE INDEX IF NOT EXISTS idx_reservations_slot ON reservations(professor_id, day, time);",
    "CREATE INDEX IF NOT EXISTS idx_reservations_user_id ON reservations(user_id);",
    "CREATE INDEX IF NOT EXISTS idx_evaluation_results_course ON evaluation_results(course_code);",
    "CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id);",
    "CREATE INDEX IF NOT EXISTS idx_project_comments_project_id ON project_comments(project_id);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, statement) in SCHEMA {
        tracing::debug!("Creating table {}", table);
        sqlx::query(statement).execute(pool).await?;
    }

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
