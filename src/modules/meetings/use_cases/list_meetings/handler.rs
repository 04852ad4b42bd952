use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_LIST, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::list_meetings::decide::decide_listing;
use crate::modules::meetings::use_cases::list_meetings::query::{ListMeetings, MeetingPage};

const OPERATION: &str = "list_meetings";

pub struct ListMeetingsHandler {
    deps: MeetingDeps,
}

impl ListMeetingsHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        query: ListMeetings,
    ) -> Result<MeetingPage, MeetingError> {
        decide_listing(&query.filter, query.page)?;
        self.deps
            .authorize(query.actor_id, query.org_id, None, ACTIVITY_LIST)
            .await?;

        let (meetings, total) = self
            .deps
            .with_ledger(context, OPERATION, || async {
                self.deps
                    .ledger
                    .list_meetings(query.org_id, &query.filter, query.page)
                    .await
                    .map_err(ledger_err(OPERATION))
            })
            .await?;

        tracing::debug!(org_id = %query.org_id, total, returned = meetings.len(), "meetings listed");
        Ok(MeetingPage {
            meetings: meetings.iter().map(MeetingView::from).collect(),
            total,
            page: query.page.page,
            page_size: query.page.page_size,
        })
    }
}

#[cfg(test)]
mod list_meetings_handler_tests {
    use super::*;
    use crate::modules::meetings::adapters::outbound::ledger::{MeetingFilter, Page};
    use crate::tests::fixtures::harness::{Harness, before_each};
    use chrono::Duration;
    use rstest::rstest;
    use uuid::Uuid;

    fn listing(
        harness: &Harness,
        filter: MeetingFilter,
        page: u32,
        page_size: u32,
    ) -> ListMeetings {
        ListMeetings {
            org_id: harness.org_id,
            actor_id: harness.actor_id,
            filter,
            page: Page { page, page_size },
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_page_newest_first(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        for purpose in ["first", "second", "third"] {
            harness.draft(purpose).await;
            harness.clock.advance(Duration::seconds(1));
        }

        let page = harness
            .app
            .list_meetings
            .handle(&harness.context(), listing(&harness, MeetingFilter::default(), 1, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let purposes: Vec<_> = page.meetings.iter().map(|m| m.purpose.as_str()).collect();
        assert_eq!(purposes, ["third", "second"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_on_activity(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        harness.draft("idle").await;
        let active = harness.active("running").await;
        let filter = MeetingFilter {
            is_active: Some(true),
            ..MeetingFilter::default()
        };

        let page = harness
            .app
            .list_meetings
            .handle(&harness.context(), listing(&harness, filter, 1, 20))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.meetings[0].id, active.id);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_skip_other_orgs_and_tombstones(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let kept = harness.draft("kept").await;
        let gone = harness.draft("gone").await;
        harness
            .app
            .delete_meeting
            .handle(&harness.context(), harness.delete_command(gone.id))
            .await
            .unwrap();

        let page = harness
            .app
            .list_meetings
            .handle(&harness.context(), listing(&harness, MeetingFilter::default(), 1, 20))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.meetings[0].id, kept.id);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_listing_a_foreign_org(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let mut query = listing(&harness, MeetingFilter::default(), 1, 20);
        query.org_id = Uuid::now_v7();
        let result = harness.app.list_meetings.handle(&harness.context(), query).await;
        assert!(matches!(result, Err(MeetingError::Forbidden { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_oversized_pages(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let result = harness
            .app
            .list_meetings
            .handle(&harness.context(), listing(&harness, MeetingFilter::default(), 1, 500))
            .await;
        assert!(matches!(result, Err(MeetingError::Validation(_))));
    }
}
