use crate::{HarvestEffect, HarvestMsg, HarvestState, StopReason};

/// Pure update function: applies a message to the harvest state and returns
/// the effects the driver must run next.
pub fn update(mut state: HarvestState, msg: HarvestMsg) -> (HarvestState, Vec<HarvestEffect>) {
    let effects = match msg {
        HarvestMsg::Start => vec![next_request(&state)],
        HarvestMsg::PageLoaded {
            page,
            records,
            item_count,
        } => {
            if records.is_empty() {
                let reason = if item_count > 0 {
                    StopReason::UnrecognizedItems {
                        page,
                        items: item_count,
                    }
                } else {
                    StopReason::EndOfData { page }
                };
                return (state, vec![HarvestEffect::Stop(reason)]);
            }

            state.append_page(page, records);
            let more_pages_allowed = page < state.max_pages();
            if more_pages_allowed && !state.record_limit_reached() {
                vec![HarvestEffect::Throttle, next_request(&state)]
            } else {
                vec![next_request(&state)]
            }
        }
        HarvestMsg::PageFailed { page, message } => {
            vec![HarvestEffect::Stop(StopReason::TransportFailure {
                page,
                message,
            })]
        }
    };

    (state, effects)
}

fn next_request(state: &HarvestState) -> HarvestEffect {
    if state.next_page() > state.max_pages() {
        return HarvestEffect::Stop(StopReason::PageLimit);
    }
    if state.record_limit_reached() {
        return HarvestEffect::Stop(StopReason::RecordLimit);
    }
    HarvestEffect::FetchPage {
        page: state.next_page(),
        cursor: state.cursor().to_string(),
    }
}
