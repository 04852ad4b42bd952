use std::sync::Arc;

use crate::modules::meetings::application::deps::MeetingDeps;
use crate::modules::meetings::use_cases::create_meeting::handler::CreateMeetingHandler;
use crate::modules::meetings::use_cases::delete_meeting::handler::DeleteMeetingHandler;
use crate::modules::meetings::use_cases::get_meeting::handler::GetMeetingHandler;
use crate::modules::meetings::use_cases::get_meeting_cost::handler::GetMeetingCostHandler;
use crate::modules::meetings::use_cases::list_meetings::handler::ListMeetingsHandler;
use crate::modules::meetings::use_cases::participation::handler::ParticipationHandler;
use crate::modules::meetings::use_cases::start_meeting::handler::StartMeetingHandler;
use crate::modules::meetings::use_cases::stop_meeting::handler::StopMeetingHandler;
use crate::modules::meetings::use_cases::subscribe_to_meeting::handler::SubscribeToMeetingHandler;
use crate::modules::meetings::use_cases::update_meeting::handler::UpdateMeetingHandler;

#[derive(Clone)]
pub struct AppState {
    pub create_meeting: Arc<CreateMeetingHandler>,
    pub get_meeting: Arc<GetMeetingHandler>,
    pub start_meeting: Arc<StartMeetingHandler>,
    pub stop_meeting: Arc<StopMeetingHandler>,
    pub update_meeting: Arc<UpdateMeetingHandler>,
    pub delete_meeting: Arc<DeleteMeetingHandler>,
    pub list_meetings: Arc<ListMeetingsHandler>,
    pub get_meeting_cost: Arc<GetMeetingCostHandler>,
    pub participation: Arc<ParticipationHandler>,
    pub subscribe_to_meeting: Arc<SubscribeToMeetingHandler>,
}

impl AppState {
    pub fn new(deps: MeetingDeps) -> Self {
        Self {
            create_meeting: Arc::new(CreateMeetingHandler::new(deps.clone())),
            get_meeting: Arc::new(GetMeetingHandler::new(deps.clone())),
            start_meeting: Arc::new(StartMeetingHandler::new(deps.clone())),
            stop_meeting: Arc::new(StopMeetingHandler::new(deps.clone())),
            update_meeting: Arc::new(UpdateMeetingHandler::new(deps.clone())),
            delete_meeting: Arc::new(DeleteMeetingHandler::new(deps.clone())),
            list_meetings: Arc::new(ListMeetingsHandler::new(deps.clone())),
            get_meeting_cost: Arc::new(GetMeetingCostHandler::new(deps.clone())),
            participation: Arc::new(ParticipationHandler::new(deps.clone())),
            subscribe_to_meeting: Arc::new(SubscribeToMeetingHandler::new(deps)),
        }
    }
}
