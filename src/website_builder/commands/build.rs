use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::pipeline::{ArtifactGenerator, Pipeline};
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub fn run<H, C, G>(
    store: &mut VersionedStore<H, C>,
    topic: &str,
    generator: &mut G,
) -> Result<CmdResult>
where
    H: HistoryBackend,
    C: Clock,
    G: ArtifactGenerator,
{
    let pipeline = Pipeline::new(topic)?;
    let report = pipeline.run(generator, store)?;

    let mut result = CmdResult::default().with_paths(report.written_paths());
    for output in &report.outputs {
        if output.path.is_none() {
            result.add_message(CmdMessage::info(format!("{} finished", output.task)));
        }
    }
    result.add_message(CmdMessage::success(format!(
        "Website for '{}' built: {} files written",
        pipeline.topic(),
        result.paths.len()
    )));
    Ok(result)
}
