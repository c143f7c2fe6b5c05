use actix_web::http::header;
use actix_web::HttpResponse;
use serde::Serialize;

/// Redirect-after-post: the client re-requests `location` with GET.
pub fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found().insert_header((header::LOCATION, location.into())).finish()
}

pub fn detail_url(question_id: i32) -> String {
    format!("/{}/", question_id)
}

pub fn results_url(question_id: i32) -> String {
    format!("/{}/results/", question_id)
}

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>) -> Self {
        let total = list.len() as i64;
        List { list, total }
    }
}

/// Describes an empty form for GET requests on form endpoints.
#[derive(Debug, Serialize)]
pub struct FormSpec {
    pub fields: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl FormSpec {
    pub fn new(fields: &'static [&'static str]) -> Self {
        Self { fields, next: None }
    }
}
