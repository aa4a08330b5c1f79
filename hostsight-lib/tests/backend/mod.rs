//! A wiremock stand-in for the visibility backend, serving the payloads in `tests/fixtures`

use hostsight_lib::sources::Dimension;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixture(dimension: Dimension) -> Value {
    let text = match dimension {
        Dimension::Global => include_str!("../fixtures/global.json"),
        Dimension::Infrastructure => include_str!("../fixtures/infrastructure.json"),
        Dimension::Regional => include_str!("../fixtures/regional.json"),
        Dimension::BusinessUnit => include_str!("../fixtures/business_unit.json"),
        Dimension::SystemClassification => include_str!("../fixtures/system_classification.json"),
        Dimension::SecurityControl => include_str!("../fixtures/security_control.json"),
        Dimension::Logging => include_str!("../fixtures/logging.json"),
        Dimension::Domain => include_str!("../fixtures/domain.json"),
    };

    serde_json::from_str(text).expect("fixture should be valid JSON")
}

/// Serve every dimension's fixture, except those listed in `failing`, which answer with a 500.
pub async fn start(failing: &[Dimension]) -> MockServer {
    let server = MockServer::start().await;

    for dimension in Dimension::all() {
        let response = if failing.contains(&dimension) {
            ResponseTemplate::new(500).set_body_string("internal error")
        } else {
            ResponseTemplate::new(200).set_body_json(fixture(dimension))
        };

        Mock::given(method("GET"))
            .and(path(dimension.path()))
            .respond_with(response)
            .mount(&server)
            .await;
    }

    server
}
