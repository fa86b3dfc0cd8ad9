use std::io::BufRead;

use rand::{SeedableRng, rngs::StdRng};
use spellchipper::{
    corpus::LineCleaner,
    noise::Synthesizer,
    pretokenize::{PreTokenizer, WordPreTokenizer},
};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Args for the synth command.
#[derive(clap::Args, Debug)]
pub struct SynthArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Rng seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Target error rate.
    #[arg(long, default_value_t = 0.2)]
    percent_err: f64,

    /// Skip sentences with fewer tokens.
    #[arg(long, default_value_t = 0)]
    min_num_tokens: usize,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl SynthArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let cleaner = LineCleaner::new()?;
        let pre_tokenizer = WordPreTokenizer::new()?;
        let synthesizer = Synthesizer::with_percent_err(self.percent_err)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        let (mut written, mut skipped) = (0usize, 0usize);
        for line in reader.lines() {
            let line = cleaner.clean(&line?);
            let tokens = pre_tokenizer.pre_tokenize(&line);
            if tokens.is_empty() || tokens.len() < self.min_num_tokens {
                skipped += 1;
                continue;
            }

            let example = synthesizer.synthesize(&mut rng, &tokens);
            writer.write_example(&example)?;
            written += 1;
        }
        writer.flush()?;

        log::info!("wrote {written} examples, skipped {skipped} lines");
        Ok(())
    }
}
