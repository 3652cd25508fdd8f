mod support;

use obd_core::{
    update, Effect, Failure, Filter, FilterCounts, Msg, NoticeLevel, PipelineEvent, RemoteCall,
    RemoteService, ScrubOptions, ValidationError,
};
use pretty_assertions::assert_eq;
use support::{numbers, outcome, remote_calls, scrubbed, signed_in, uploaded};

#[test]
fn upload_success_auto_triggers_scrub_with_current_options() {
    let state = signed_in();
    let (state, _) = update(state, Msg::FilterToggled {
        filter: Filter::Operator,
        enabled: false,
    });
    let (state, effects) = uploaded(state, 3);

    assert_eq!(state.intake().total, 3);
    assert!(state.pending().scrub);
    assert_eq!(
        remote_calls(&effects),
        vec![&RemoteCall::Scrub {
            numbers: numbers(3),
            options: ScrubOptions {
                operator: false,
                ..ScrubOptions::default()
            },
            generation: state.intake_generation(),
        }]
    );
}

#[test]
fn upload_with_zero_total_does_not_scrub() {
    let (mut state, effects) = uploaded(signed_in(), 0);

    assert!(effects.is_empty());
    assert!(!state.pending().scrub);
    assert_eq!(state.take_notices()[0].level, NoticeLevel::Info);
}

#[test]
fn failed_upload_keeps_previous_results() {
    let state = scrubbed(10, 8);
    let before = state.review().clone();
    let (state, _) = update(
        state,
        Msg::FileChosen {
            path: "second.xlsx".into(),
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::UploadFailed(Failure::OversizedPayload {
            service: RemoteService::Intake,
        }),
    );

    assert!(effects.is_empty());
    assert_eq!(state.review(), &before);
    assert_eq!(state.intake().total, 10);
    assert!(state.take_notices()[0].text.contains("smaller batches"));
}

#[test]
fn second_upload_while_pending_is_refused() {
    let state = signed_in();
    let (state, first) = update(
        state,
        Msg::FileChosen {
            path: "a.csv".into(),
        },
    );
    let (mut state, second) = update(
        state,
        Msg::FileChosen {
            path: "b.csv".into(),
        },
    );
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(state.take_notices()[0].level, NoticeLevel::Warning);
}

#[test]
fn scrub_with_empty_list_is_a_noop() {
    let mut state = signed_in();
    state.consume_dirty();
    let before = state.clone();

    let (mut next, effects) = update(state, Msg::RunScrubClicked);

    assert!(effects.is_empty());
    assert_eq!(next, before);
    assert!(!next.consume_dirty());
}

#[test]
fn scrub_scenario_updates_review_state() {
    let (state, _) = uploaded(signed_in(), 100);
    let generation = state.intake_generation();
    let removed = FilterCounts {
        dnd: 10,
        sub: 5,
        unsub: 3,
        operator: 2,
    };
    let (state, effects) = update(
        state,
        Msg::ScrubSucceeded {
            generation,
            outcome: outcome(100, 80, removed),
            side_channel_warning: None,
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.total, 100);
    assert_eq!(view.final_count, 80);
    assert_eq!(view.removed(Filter::Dnd), 10);
    assert_eq!(view.removed(Filter::Sub), 5);
    assert_eq!(view.removed(Filter::Unsub), 3);
    assert_eq!(view.removed(Filter::Operator), 2);
    assert_eq!(view.filters[0].fraction, 0.1);

    let committed = state.review().outcome().unwrap();
    assert_eq!(committed.final_count() as usize, committed.final_list().len());
    assert!(committed.final_count() <= committed.total_input());
    for filter in Filter::ALL {
        assert!(committed.per_filter_removed().get(filter) <= committed.total_input());
    }
}

#[test]
fn email_failure_commits_result_and_warns() {
    let (state, _) = uploaded(signed_in(), 5);
    let generation = state.intake_generation();
    let (mut state, _) = update(
        state,
        Msg::ScrubSucceeded {
            generation,
            outcome: outcome(5, 4, FilterCounts::default()),
            side_channel_warning: Some("FAILED: smtp timeout".into()),
        },
    );

    assert_eq!(state.review().cleaned_list().len(), 4);
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].text.contains("smtp timeout"));
    assert_eq!(
        state.events().last(),
        Some(&PipelineEvent::SideChannelWarning {
            detail: "FAILED: smtp timeout".into()
        })
    );
}

#[test]
fn oversized_and_server_errors_read_differently() {
    let failures = [
        Failure::OversizedPayload {
            service: RemoteService::Scrub,
        },
        Failure::ServiceRejected {
            service: RemoteService::Scrub,
            status: 500,
            detail: "HTTP 500".into(),
        },
    ];
    let texts: Vec<String> = failures
        .into_iter()
        .map(|failure| {
            let (state, _) = uploaded(signed_in(), 2);
            let generation = state.intake_generation();
            let (mut state, _) = update(
                state,
                Msg::ScrubFailed {
                    generation,
                    failure,
                },
            );
            assert!(state.review().outcome().is_none());
            state.take_notices().remove(0).text
        })
        .collect();
    assert!(texts[0].contains("split the file"));
    assert!(!texts[1].contains("split the file"));
}

#[test]
fn new_upload_resets_session_stats() {
    let state = scrubbed(10, 5);
    assert!(state.review().outcome().is_some());
    let (state, _) = uploaded(state, 4);
    assert_eq!(state.review().stats(), FilterCounts::default());
    assert!(state.review().cleaned_list().is_empty());
}

#[test]
fn export_with_empty_list_only_notifies() {
    let (mut state, effects) = update(signed_in(), Msg::ExportClicked);
    assert!(effects.is_empty());
    assert!(state.take_notices()[0].text.contains("No data to download"));
}

#[test]
fn export_and_copy_serialize_cleaned_list() {
    let state = scrubbed(3, 2);
    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::SaveExport {
            payload: format!("msisdn\n{}", numbers(2).join("\n")),
            rows: 2,
        }]
    );
    let (_, effects) = update(state, Msg::CopyAllClicked);
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            text: numbers(2).join("\n"),
        }]
    );
}

#[test]
fn log_entry_forwards_outcome_and_stats() {
    let state = scrubbed(3, 2);
    let expected = state.review().outcome().cloned().unwrap();
    let (state, effects) = update(state, Msg::LogEntryClicked);
    assert_eq!(
        remote_calls(&effects),
        vec![&RemoteCall::AppendHistory {
            outcome: expected,
            stats: FilterCounts::default(),
        }]
    );
    let (mut state, _) = update(
        state,
        Msg::LogEntrySucceeded {
            message: "Scrub entry logged".into(),
        },
    );
    assert_eq!(state.take_notices()[0].text, "Scrub entry logged");
    assert!(!state.pending().log_entry);
}

#[test]
fn log_entry_before_scrub_is_a_validation_error() {
    let (mut state, effects) = update(signed_in(), Msg::LogEntryClicked);
    assert!(effects.is_empty());
    assert!(state.take_notices()[0]
        .text
        .contains(&ValidationError::EmptyCleanedList.to_string()));
}

#[test]
fn history_failure_is_reported_generically() {
    let (state, effects) = update(signed_in(), Msg::HistoryRequested);
    assert_eq!(remote_calls(&effects), vec![&RemoteCall::FetchHistory]);
    let (mut state, _) = update(
        state,
        Msg::HistoryFailed(Failure::Unreachable {
            service: RemoteService::History,
            reason: "timed out".into(),
        }),
    );
    let notice = state.take_notices().remove(0);
    assert!(notice.text.starts_with("Could not load history"));
    assert!(state.history().is_empty());
}

#[test]
fn navigating_away_discards_session_scoped_data() {
    let state = scrubbed(3, 2);
    let (state, _) = update(state, Msg::NavigatedAway);
    assert!(state.review().outcome().is_none());
    assert!(state.intake().numbers.is_empty());
    assert_eq!(state.events().last(), Some(&PipelineEvent::SessionDiscarded));
}

#[test]
fn newer_upload_supersedes_in_flight_scrub() {
    let (state, _) = uploaded(signed_in(), 10);
    let first = state.intake_generation();

    let (mut state, effects) = uploaded(state, 3);
    let second = state.intake_generation();
    assert_ne!(first, second);
    assert!(state.take_notices().is_empty());
    assert_eq!(
        remote_calls(&effects),
        vec![&RemoteCall::Scrub {
            numbers: numbers(3),
            options: ScrubOptions::default(),
            generation: second,
        }]
    );

    let (state, _) = update(
        state,
        Msg::ScrubSucceeded {
            generation: first,
            outcome: outcome(10, 7, FilterCounts::default()),
            side_channel_warning: None,
        },
    );
    assert!(state.review().outcome().is_none());
    assert!(state.pending().scrub);

    let (state, _) = update(
        state,
        Msg::ScrubSucceeded {
            generation: second,
            outcome: outcome(3, 2, FilterCounts::default()),
            side_channel_warning: None,
        },
    );
    let view = state.view();
    assert_eq!(view.total, 3);
    assert_eq!(view.final_count, 2);
    assert!(!state.pending().scrub);
}

#[test]
fn stale_scrub_failure_is_dropped() {
    let (state, _) = uploaded(signed_in(), 4);
    let first = state.intake_generation();
    let (mut state, _) = uploaded(state, 2);
    state.take_notices();

    let (mut state, effects) = update(
        state,
        Msg::ScrubFailed {
            generation: first,
            failure: Failure::ServiceRejected {
                service: RemoteService::Scrub,
                status: 500,
                detail: "HTTP 500".into(),
            },
        },
    );
    assert!(effects.is_empty());
    assert!(state.take_notices().is_empty());
    assert!(state.pending().scrub);
}

#[test]
fn scrub_result_after_navigating_away_is_dropped() {
    let (state, _) = uploaded(signed_in(), 4);
    let generation = state.intake_generation();
    let (state, _) = update(state, Msg::NavigatedAway);
    let (state, _) = update(
        state,
        Msg::ScrubSucceeded {
            generation,
            outcome: outcome(4, 3, FilterCounts::default()),
            side_channel_warning: None,
        },
    );
    assert!(state.review().outcome().is_none());
    assert_eq!(state.view().final_count, 0);
}
