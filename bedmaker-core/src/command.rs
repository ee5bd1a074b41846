use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display};
use std::path::Path;

use log::debug;

use crate::config::ToolPaths;
use crate::consts::{DEV_STDIN, DEV_STDOUT};
use crate::models::{ConversionRequest, InputType};

/// A single external program call: the executable and its argument list.
///
/// Arguments are passed to the process as-is, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Quote a word for display the way a POSIX shell would need it.
fn shell_quote(word: &str) -> Cow<'_, str> {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));

    if is_plain {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
    }
}

/// How a conversion is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Run the peak caller directly on the input file.
    DirectCall(Invocation),
    /// Stream the output of `producer` into the stdin of `consumer`. No intermediate file.
    StreamedCall {
        producer: Invocation,
        consumer: Invocation,
    },
    /// Run a format converter taking an input and an output path.
    DirectConvert(Invocation),
}

impl CommandKind {
    /// Invocations in pipeline order.
    pub fn invocations(&self) -> Vec<&Invocation> {
        match self {
            CommandKind::DirectCall(invocation) | CommandKind::DirectConvert(invocation) => {
                vec![invocation]
            }
            CommandKind::StreamedCall { producer, consumer } => vec![producer, consumer],
        }
    }

    /// Executables this command needs.
    pub fn programs(&self) -> Vec<&str> {
        self.invocations()
            .into_iter()
            .map(|invocation| invocation.program.as_str())
            .collect()
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::DirectCall(invocation) | CommandKind::DirectConvert(invocation) => {
                write!(f, "{}", invocation)
            }
            CommandKind::StreamedCall { producer, consumer } => {
                write!(f, "{} | {}", producer, consumer)
            }
        }
    }
}

/// Picks the converter command for a request.
#[derive(Debug, Clone, Default)]
pub struct CommandSelector {
    tools: ToolPaths,
}

impl CommandSelector {
    pub fn new(tools: ToolPaths) -> Self {
        CommandSelector { tools }
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    ///
    /// Build the command that converts the request's input into `target`.
    ///
    /// - bedGraph: `macs2 <mode> -i <input> -o <target>`
    /// - bigWig: `bigWigToBedGraph <input> /dev/stdout | macs2 <mode> -i /dev/stdin -o <target>`
    /// - bigBed: `bigBedToBed <input> <target>`
    ///
    /// `<mode>` is `bdgpeakcall` for TF experiments and `bdgbroadcall` for histone experiments.
    /// It does not apply to bigBed.
    ///
    pub fn select(&self, request: &ConversionRequest, target: &Path) -> CommandKind {
        let input = request.input_path();
        let mode = request.experiment().peak_call_mode();

        let command = match request.input_type() {
            InputType::BedGraph => CommandKind::DirectCall(self.peak_caller(mode, input, target)),
            InputType::BigWig => CommandKind::StreamedCall {
                producer: Invocation::new(&self.tools.bigwig_to_bedgraph)
                    .arg(input)
                    .arg(DEV_STDOUT),
                consumer: self.peak_caller(mode, Path::new(DEV_STDIN), target),
            },
            InputType::BigBed => CommandKind::DirectConvert(
                Invocation::new(&self.tools.bigbed_to_bed)
                    .arg(input)
                    .arg(target),
            ),
        };

        debug!("Selected command for {}: {}", request.input_type(), command);
        command
    }

    fn peak_caller(&self, mode: &str, input: &Path, target: &Path) -> Invocation {
        Invocation::new(&self.tools.macs2)
            .arg(mode)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::ExperimentType;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn selector() -> CommandSelector {
        CommandSelector::new(ToolPaths::default())
    }

    fn request(input: &str, input_type: InputType, experiment: ExperimentType) -> ConversionRequest {
        ConversionRequest::new(input, input_type, experiment, "out")
    }

    #[rstest]
    #[case(ExperimentType::TfExperiment, "bdgpeakcall")]
    #[case(ExperimentType::HistoneExperiment, "bdgbroadcall")]
    fn test_bedgraph_direct_call(
        selector: CommandSelector,
        #[case] experiment: ExperimentType,
        #[case] mode: &str,
    ) {
        let request = request("/data/s.bedgraph", InputType::BedGraph, experiment);
        let command = selector.select(&request, Path::new("out/s.bed"));

        assert_eq!(
            command,
            CommandKind::DirectCall(
                Invocation::new("macs2")
                    .arg(mode)
                    .arg("-i")
                    .arg("/data/s.bedgraph")
                    .arg("-o")
                    .arg("out/s.bed")
            )
        );
        assert_eq!(
            command.to_string(),
            format!("macs2 {mode} -i /data/s.bedgraph -o out/s.bed")
        );
    }

    #[rstest]
    #[case(ExperimentType::TfExperiment, "bdgpeakcall")]
    #[case(ExperimentType::HistoneExperiment, "bdgbroadcall")]
    fn test_bigwig_streamed_call(
        selector: CommandSelector,
        #[case] experiment: ExperimentType,
        #[case] mode: &str,
    ) {
        let request = request("/data/s.bw", InputType::BigWig, experiment);
        let command = selector.select(&request, Path::new("out/s.bed"));

        let CommandKind::StreamedCall { producer, consumer } = &command else {
            panic!("expected a streamed call, got {:?}", command);
        };
        assert_eq!(producer.program, "bigWigToBedGraph");
        assert_eq!(producer.args, vec![OsString::from("/data/s.bw"), OsString::from("/dev/stdout")]);
        assert_eq!(consumer.program, "macs2");
        assert_eq!(consumer.args[0], OsString::from(mode));
        assert_eq!(
            command.to_string(),
            format!("bigWigToBedGraph /data/s.bw /dev/stdout | macs2 {mode} -i /dev/stdin -o out/s.bed")
        );
        assert_eq!(command.programs(), vec!["bigWigToBedGraph", "macs2"]);
    }

    #[rstest]
    fn test_bigbed_ignores_experiment(selector: CommandSelector) {
        let tf = request("/data/s.bb", InputType::BigBed, ExperimentType::TfExperiment);
        let histone = request("/data/s.bb", InputType::BigBed, ExperimentType::HistoneExperiment);
        let target = Path::new("out/s.bed");

        let command = selector.select(&tf, target);
        assert_eq!(command, selector.select(&histone, target));
        assert_eq!(
            command,
            CommandKind::DirectConvert(Invocation::new("bigBedToBed").arg("/data/s.bb").arg("out/s.bed"))
        );
        assert_eq!(command.to_string(), "bigBedToBed /data/s.bb out/s.bed");
    }

    #[rstest]
    fn test_custom_tool_paths() {
        let tools = ToolPaths {
            macs2: "/opt/macs2".to_string(),
            ..ToolPaths::default()
        };
        let selector = CommandSelector::new(tools);
        let request = request("/data/s.bw", InputType::BigWig, ExperimentType::TfExperiment);

        let command = selector.select(&request, Path::new("out/s.bed"));
        assert_eq!(command.programs(), vec!["bigWigToBedGraph", "/opt/macs2"]);
    }

    #[rstest]
    fn test_display_quotes_unusual_paths(selector: CommandSelector) {
        let request = request("/data/my sample's.bb", InputType::BigBed, ExperimentType::TfExperiment);
        let command = selector.select(&request, Path::new("out/my sample's.bed"));
        assert_eq!(
            command.to_string(),
            "bigBedToBed '/data/my sample'\\''s.bb' 'out/my sample'\\''s.bed'"
        );
    }
}
