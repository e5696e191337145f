use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

use crate::client::FindboligClient;
use crate::parser::MarkupStrategy;
use crate::session::{HttpSession, SessionError};
use crate::types::{BuildingId, Placements};

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Error reading the placement of building #{building}: {source}")]
    Request {
        building: BuildingId,
        #[source]
        source: SessionError,
    },
    #[error("Error reading the placement of building #{building}: response is not JSON: {source}")]
    MalformedJson {
        building: BuildingId,
        #[source]
        source: serde_json::Error,
    },
    #[error("Error reading the placement of building #{building}: no rank in the JSON structure")]
    MissingRank { building: BuildingId },
    #[error("Error reading the placement of building #{building}: '{value}' is not a valid rank")]
    InvalidRank { building: BuildingId, value: String },
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Reads `d.WaitPlacement` from a rank response. The service wraps results
/// in `d`; a rank of zero is indistinguishable from a missing one.
// TODO: confirm whether the rank service ever answers 0 for a building at the
// front of the queue; if so, zero should become a valid rank.
fn parse_wait_placement(building: BuildingId, body: &str) -> Result<u64, PlacementError> {
    let response: Value = serde_json::from_str(body)
        .map_err(|source| PlacementError::MalformedJson { building, source })?;

    let rank = response
        .get("d")
        .filter(|d| is_truthy(d))
        .and_then(|d| d.get("WaitPlacement"))
        .filter(|rank| is_truthy(rank))
        .ok_or(PlacementError::MissingRank { building })?;

    let invalid = || PlacementError::InvalidRank {
        building,
        value: rank.to_string(),
    };
    let rank = match rank {
        Value::Number(n) => n.as_u64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if rank == 0 {
        return Err(PlacementError::MissingRank { building });
    }
    Ok(rank)
}

impl<S: HttpSession, M: MarkupStrategy> FindboligClient<S, M> {
    /// Looks up the waitlist rank of every building, one request at a time,
    /// sleeping `delay` after each request. The first failure aborts the
    /// whole lookup.
    pub fn extract_waitinglist_placements(
        &self,
        buildings: &[BuildingId],
        delay: Duration,
    ) -> Result<Placements, PlacementError> {
        let url = self.config.placement_url();
        let mut placements = Placements::new();

        for &building in buildings {
            log::debug!("Requesting placement on building #{}.", building);

            let body = json!({ "buildingId": building.get() });
            let response = self
                .session
                .post_json(&url, &body)
                .map_err(|source| PlacementError::Request { building, source })?;

            let rank = parse_wait_placement(building, &response)?;
            log::debug!("It was {}.", rank);
            placements.insert(building, rank);

            thread::sleep(delay);
        }

        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortalConfig;
    use crate::parser::Extractor;
    use crate::session::fake::{Request, ScriptedSession};
    use std::time::Instant;

    fn building(id: u64) -> BuildingId {
        BuildingId::new(id).unwrap()
    }

    fn client(session: ScriptedSession) -> FindboligClient<ScriptedSession, Extractor> {
        FindboligClient::with_session(session, Extractor::Pattern, PortalConfig::default())
    }

    #[test]
    fn test_parse_wait_placement_number() {
        let rank = parse_wait_placement(building(3), r#"{"d": {"__type": "Rank", "WaitPlacement": 412}}"#)
            .expect("Failed to parse rank");
        assert_eq!(rank, 412);
    }

    #[test]
    fn test_parse_wait_placement_numeric_string() {
        let rank = parse_wait_placement(building(3), r#"{"d": {"WaitPlacement": "57"}}"#).unwrap();
        assert_eq!(rank, 57);
    }

    #[test]
    fn test_parse_wait_placement_missing_structure() {
        for body in [
            r#"{}"#,
            r#"{"d": null}"#,
            r#"{"d": {}}"#,
            r#"{"d": {"WaitPlacement": null}}"#,
            r#"{"d": "unexpected"}"#,
        ] {
            let err = parse_wait_placement(building(3), body).unwrap_err();
            assert!(
                matches!(err, PlacementError::MissingRank { .. }),
                "{} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_parse_wait_placement_zero_is_missing() {
        let err = parse_wait_placement(building(3), r#"{"d": {"WaitPlacement": 0}}"#).unwrap_err();
        assert!(matches!(err, PlacementError::MissingRank { .. }));

        let err = parse_wait_placement(building(3), r#"{"d": {"WaitPlacement": "0"}}"#).unwrap_err();
        assert!(matches!(err, PlacementError::MissingRank { .. }));
    }

    #[test]
    fn test_parse_wait_placement_invalid_rank() {
        for body in [
            r#"{"d": {"WaitPlacement": -5}}"#,
            r#"{"d": {"WaitPlacement": 2.5}}"#,
            r#"{"d": {"WaitPlacement": "ukendt"}}"#,
            r#"{"d": {"WaitPlacement": [1]}}"#,
        ] {
            let err = parse_wait_placement(building(3), body).unwrap_err();
            assert!(
                matches!(err, PlacementError::InvalidRank { .. }),
                "{} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_parse_wait_placement_not_json() {
        let err = parse_wait_placement(building(3), "<html>Server Error</html>").unwrap_err();
        assert!(matches!(err, PlacementError::MalformedJson { .. }));
    }

    #[test]
    fn test_extract_placements_posts_each_building_in_order() {
        let session = ScriptedSession::new()
            .respond(r#"{"d": {"WaitPlacement": 120}}"#)
            .respond(r#"{"d": {"WaitPlacement": 8}}"#);
        let client = client(session);

        let placements = client
            .extract_waitinglist_placements(&[building(1043), building(87)], Duration::ZERO)
            .expect("Failed to fetch placements");

        assert_eq!(placements.len(), 2);
        assert_eq!(placements.get(building(1043)), Some(120));
        assert_eq!(placements.get(building(87)), Some(8));

        let requests = client.session.requests.borrow();
        let url = "https://www.findbolig.nu/Services/WaitlistService.asmx/GetWaitlistRank";
        assert_eq!(
            requests[0],
            Request::Json(url.to_string(), json!({ "buildingId": 1043 }))
        );
        assert_eq!(
            requests[1],
            Request::Json(url.to_string(), json!({ "buildingId": 87 }))
        );
    }

    #[test]
    fn test_extract_placements_empty_list_makes_no_requests() {
        let client = client(ScriptedSession::new());

        let placements = client
            .extract_waitinglist_placements(&[], Duration::from_secs(5))
            .unwrap();

        assert!(placements.is_empty());
        assert_eq!(client.session.request_count(), 0);
    }

    #[test]
    fn test_extract_placements_aborts_on_first_failure() {
        let session = ScriptedSession::new()
            .respond(r#"{"d": {"WaitPlacement": 120}}"#)
            .respond(r#"{"d": {"WaitPlacement": 0}}"#)
            .respond(r#"{"d": {"WaitPlacement": 3}}"#);
        let client = client(session);

        let err = client
            .extract_waitinglist_placements(
                &[building(1), building(2), building(3)],
                Duration::ZERO,
            )
            .unwrap_err();

        assert!(matches!(err, PlacementError::MissingRank { building: b } if b.get() == 2));
        assert_eq!(client.session.request_count(), 2);
    }

    #[test]
    fn test_extract_placements_reports_http_failure() {
        let client = client(ScriptedSession::new().fail(500));

        let err = client
            .extract_waitinglist_placements(&[building(9)], Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, PlacementError::Request { .. }));
    }

    #[test]
    fn test_extract_placements_sleeps_after_every_request() {
        let session = ScriptedSession::new()
            .respond(r#"{"d": {"WaitPlacement": 1}}"#)
            .respond(r#"{"d": {"WaitPlacement": 2}}"#);
        let client = client(session);

        let started = Instant::now();
        client
            .extract_waitinglist_placements(&[building(1), building(2)], Duration::from_millis(40))
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
