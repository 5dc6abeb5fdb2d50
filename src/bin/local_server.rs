use std::path::Path;

use rocket::http::{ContentType, Status};
use rocket::serde::json::Json;
use serde_derive::{Deserialize, Serialize};

use ::veloconv::processors::ConvertParams;
use ::veloconv::App;

#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin-Resource-Sharing Fairing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, PATCH, PUT, DELETE, HEAD, OPTIONS, GET",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[options("/<_..>")]
fn all_options() {
    /* Intentionally left empty */
}

#[derive(Debug, Default, Deserialize)]
struct ConvertOptions {
    m: Option<f64>,
    x: Option<f64>,
    z: Option<f64>,
    p: Option<f64>,
    s: Option<f64>,
    i: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ConvertRequest {
    file: String,
    #[serde(default)]
    options: ConvertOptions,
}

#[derive(Debug, Serialize)]
struct ConvertResponse {
    result: &'static str,
    message: String,
}

impl ConvertOptions {
    fn to_params(&self) -> ConvertParams {
        let base = ConvertParams::default();

        ConvertParams {
            average_height: self.z.unwrap_or(base.average_height),
            max_divergence: self.p.unwrap_or(base.max_divergence),
            min_length: self.m.unwrap_or(base.min_length),
            max_length: self.x.unwrap_or(base.max_length),
            segment_length: self.s.unwrap_or(base.segment_length),
            survey_id: self.i.unwrap_or(base.survey_id),
        }
    }
}

fn run_conversion(request: &ConvertRequest) -> ConvertResponse {
    let app = match App::new(request.options.to_params()) {
        Ok(app) => app,
        Err(err) => {
            return ConvertResponse {
                result: "error",
                message: err.to_string(),
            }
        }
    };

    match app.convert_file(Path::new(&request.file)) {
        Ok(outcome) => ConvertResponse {
            result: "ok",
            message: outcome
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";"),
        },
        Err(err) => ConvertResponse {
            result: "error",
            message: err.to_string(),
        },
    }
}

#[post("/veloconv", data = "<request>")]
async fn veloconv(request: Json<ConvertRequest>) -> (Status, (ContentType, String)) {
    let response = run_conversion(&request);

    let status = if response.result == "ok" {
        Status::Ok
    } else {
        Status::UnprocessableEntity
    };

    (
        status,
        (ContentType::JSON, serde_json::to_string(&response).unwrap()),
    )
}

#[launch]
fn rocket() -> _ {
    rocket::build()
        .attach(Cors)
        .mount("/", routes![veloconv, all_options])
}
