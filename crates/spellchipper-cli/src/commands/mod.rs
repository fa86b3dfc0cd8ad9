mod batch;
mod synth;

/// Subcommands for spellchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Synthesize noisy training examples from sentences, as JSON lines.
    Synth(synth::SynthArgs),

    /// Build encoded batches from a corpus and report their shapes.
    Batch(batch::BatchArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Synth(cmd) => cmd.run(),
            Commands::Batch(cmd) => cmd.run(),
        }
    }
}
