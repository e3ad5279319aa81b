#[path = "../test_utils.rs"]
mod test_utils;

mod evaluation_test;
mod middleware_test;
mod postgres_test;
mod professor_test;
mod question_test;
mod router_test;
mod schedule_test;
