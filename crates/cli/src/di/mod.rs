use ferrous_replay_application::services::{
    build_retry_strategy, BoundedDispatcher, OffsetScheduler,
};
use ferrous_replay_application::use_cases::ReplayTrafficUseCase;
use ferrous_replay_domain::Config;
use ferrous_replay_infrastructure::dns::forwarding::MessageBuilder;
use ferrous_replay_infrastructure::dns::NameserverClient;
use ferrous_replay_infrastructure::input::CsvQuerySource;
use std::sync::Arc;
use tracing::info;

pub struct ReplayServices {
    pub replay: Arc<ReplayTrafficUseCase>,
}

impl ReplayServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let replay = &config.replay;
        let nameserver = replay.nameserver_addr()?;

        let client = NameserverClient::new(nameserver, replay.query_timeout())
            .with_response_id_validation(replay.validate_response_id);
        let retry = build_retry_strategy(&replay.retry, replay.seed);

        info!(
            nameserver = %nameserver,
            workers = replay.workers,
            retry = retry.name(),
            schedule = replay.schedule.as_str(),
            validate_response_id = replay.validate_response_id,
            "Initializing replay services"
        );

        let dispatcher = BoundedDispatcher::new(
            Arc::new(MessageBuilder::new()),
            Arc::new(client),
            retry,
            replay.workers,
        );

        let source = CsvQuerySource::new(&replay.input, replay.unsupported_types.clone());

        Ok(Self {
            replay: Arc::new(ReplayTrafficUseCase::new(
                Arc::new(source),
                OffsetScheduler::new(replay.schedule),
                Arc::new(dispatcher),
                replay.queue_capacity,
            )),
        })
    }
}
