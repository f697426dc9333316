use crate::domain::state::{Phase, Team};
use crate::errors::{DomainError, ErrorCode};
use crate::protocol::ServerMsg;

#[test]
fn every_domain_error_has_a_stable_code() {
    let cases = [
        (DomainError::NotJoined, "NOT_JOINED"),
        (DomainError::AlreadyJoined, "ALREADY_JOINED"),
        (
            DomainError::phase("start_game", Phase::Lobby, Phase::Playing),
            "PHASE_MISMATCH",
        ),
        (
            DomainError::TooManyWords {
                submitted: 20,
                max: 15,
            },
            "TOO_MANY_WORDS",
        ),
        (DomainError::TeamsNotReady(Team::Red), "TEAMS_NOT_READY"),
        (DomainError::StaleWordToken, "STALE_WORD_TOKEN"),
        (DomainError::validation("Name must not be blank"), "VALIDATION_ERROR"),
    ];

    for (err, expected) in cases {
        assert_eq!(err.code().as_str(), expected, "{err:?}");
    }
}

#[test]
fn bad_request_is_reserved_for_the_transport() {
    let frame = ServerMsg::bad_request("expected value at line 1 column 1");
    match frame {
        ServerMsg::Error { code, message } => {
            assert_eq!(code, ErrorCode::BadRequest);
            assert!(message.contains("line 1"));
        }
        other => panic!("expected error frame, got {other:?}"),
    }
}

#[test]
fn messages_describe_the_violation() {
    let phase = DomainError::phase("word_success", Phase::Playing, Phase::Lobby);
    assert_eq!(
        phase.to_string(),
        "word_success is only allowed during the playing phase (current phase: lobby)"
    );

    let words = DomainError::TooManyWords {
        submitted: 4,
        max: 3,
    };
    assert!(words.to_string().contains("4 submitted"));

    let team = DomainError::TeamsNotReady(Team::Blue);
    assert_eq!(team.to_string(), "Team blue needs at least one connected player");
}

#[test]
fn error_frame_serializes_code_as_string() {
    let frame = ServerMsg::error(&DomainError::StaleWordToken);
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "error");
    assert_eq!(json["code"], "STALE_WORD_TOKEN");
}
