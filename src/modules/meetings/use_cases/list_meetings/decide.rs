use crate::modules::meetings::adapters::outbound::ledger::{MeetingFilter, Page};
use crate::modules::meetings::core::state::Rejection;
use crate::modules::meetings::use_cases::list_meetings::query::MAX_PAGE_SIZE;

pub fn decide_listing(filter: &MeetingFilter, page: Page) -> Result<(), Rejection> {
    if page.page == 0 {
        return Err(Rejection::Validation("page starts at 1".into()));
    }
    if page.page_size == 0 || page.page_size > MAX_PAGE_SIZE {
        return Err(Rejection::Validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    if let (Some(after), Some(before)) = (filter.started_after, filter.started_before) {
        if after >= before {
            return Err(Rejection::Validation("started_after must precede started_before".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod decide_listing_tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn page(page: u32, page_size: u32) -> Page {
        Page { page, page_size }
    }

    #[rstest]
    #[case(page(1, 1))]
    #[case(page(3, 100))]
    fn it_should_accept_pages_in_range(#[case] page: Page) {
        assert_eq!(decide_listing(&MeetingFilter::default(), page), Ok(()));
    }

    #[rstest]
    #[case(page(0, 20))]
    #[case(page(1, 0))]
    #[case(page(1, 101))]
    fn it_should_reject_pages_out_of_range(#[case] page: Page) {
        assert!(matches!(
            decide_listing(&MeetingFilter::default(), page),
            Err(Rejection::Validation(_))
        ));
    }

    #[rstest]
    fn it_should_reject_an_empty_window() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let filter = MeetingFilter {
            started_after: Some(at),
            started_before: Some(at - Duration::seconds(1)),
            ..MeetingFilter::default()
        };
        assert!(matches!(decide_listing(&filter, page(1, 20)), Err(Rejection::Validation(_))));
    }
}
