#![allow(dead_code)]

use std::sync::Once;

use obd_core::{
    update, AppState, AuthToken, CampaignSchedule, Effect, FilterCounts, Msg, RemoteCall,
    ScrubOutcome,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(obd_logging::initialize_for_tests);
}

pub fn numbers(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("23480{i:08}")).collect()
}

pub fn signed_in() -> AppState {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            username: "analyst".into(),
            password: "pw".into(),
        },
    );
    assert_eq!(effects.len(), 1);
    let (mut state, _) = update(
        state,
        Msg::LoginSucceeded {
            token: AuthToken::new("token-1").unwrap(),
        },
    );
    state.take_notices();
    state
}

/// Uploads `count` numbers and returns the state plus the auto-chained effects.
pub fn uploaded(state: AppState, count: usize) -> (AppState, Vec<Effect>) {
    let (state, _) = update(
        state,
        Msg::FileChosen {
            path: "leads.csv".into(),
        },
    );
    update(
        state,
        Msg::UploadSucceeded {
            total: count as u64,
            msisdns: numbers(count),
        },
    )
}

pub fn outcome(total: usize, survivors: usize, removed: FilterCounts) -> ScrubOutcome {
    ScrubOutcome::new(total as u64, removed, numbers(survivors), Vec::new()).unwrap()
}

/// Signed in, uploaded `total` numbers and committed a scrub keeping `survivors`.
pub fn scrubbed(total: usize, survivors: usize) -> AppState {
    let (state, _) = uploaded(signed_in(), total);
    let generation = state.intake_generation();
    let (mut state, _) = update(
        state,
        Msg::ScrubSucceeded {
            generation,
            outcome: outcome(total, survivors, FilterCounts::default()),
            side_channel_warning: None,
        },
    );
    state.take_notices();
    state
}

pub fn schedule() -> CampaignSchedule {
    CampaignSchedule {
        project_name: "Summer_2024".into(),
        flow_name: "promo_flow".into(),
        msc_ip: "10.1.1.1".into(),
        cli_mask: "123456".into(),
    }
}

pub fn remote_calls(effects: &[Effect]) -> Vec<&RemoteCall> {
    effects.iter().filter_map(Effect::remote_call).collect()
}
