#![allow(missing_docs)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use spellchipper::{
    collate::{BatchEncoder, BatchEncoderOptions},
    corpus::{CorpusStats, SampleProviderOptions, corpus_stats::shard_file_name},
    loader::{BatchLoader, BatchLoaderOptions},
    pretokenize::{CharPreTokenizer, PreTokenizer, WordPreTokenizer},
    vocab::{EncodeOptions, HfTokenizerService, SpecialTokens, TokenizationService},
};
use tempdir::TempDir;

const LINES: &[&str] = &[
    "Trong trận đấu thuộc vòng 19 giải V-League 2017 trên sân Long An , đội chủ nhà một lần nữa lại để chiến thắng tuột khỏi tầm tay",
    "dù đã dẫn trước Sana Khánh Hoa BVN từ rất sớm .",
    "Vì vậy , viễn cảnh đối đầu với 150.000 quân Tào vẫn khiến liên minh Tôn - Lưu ... khá dễ chịu .",
    "\u{200B}🙂",
    "Trận đấu bắt đầu lúc 15h20 , kết thúc lúc 17h .",
    "Cầu thủ cao 1m85 ghi bàn thắng quyết định .",
    "Người hâm mộ đã chờ đợi chiến thắng này rất lâu .",
];

/// A trained-format word-level `tokenizer.json` with the `[CLS] $A [SEP]` template.
fn word_level_json(tokens: &[String]) -> String {
    let specials = SpecialTokens::default();
    let mut vocab = serde_json::Map::new();
    for token in specials
        .all()
        .into_iter()
        .chain(tokens.iter().map(String::as_str))
    {
        let next = vocab.len();
        vocab.entry(token).or_insert(serde_json::json!(next));
    }
    let cls = vocab["[CLS]"].clone();
    let sep = vocab["[SEP]"].clone();

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "WhitespaceSplit"},
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
            ],
            "pair": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                {"Sequence": {"id": "B", "type_id": 1}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
            ],
            "special_tokens": {
                "[CLS]": {"id": "[CLS]", "ids": [cls], "tokens": ["[CLS]"]},
                "[SEP]": {"id": "[SEP]", "ids": [sep], "tokens": ["[SEP]"]}
            }
        },
        "decoder": null,
        "model": {"type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]"},
    })
    .to_string()
}

/// Write a corpus and trained vocabularies; returns the vocabulary paths.
fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let stats = CorpusStats::for_lines(LINES.len(), 3);
    stats.save(dir).unwrap();
    for (idx, chunk) in LINES.chunks(3).enumerate() {
        fs::write(dir.join(shard_file_name(idx)), chunk.join("\n") + "\n").unwrap();
    }

    let word_tok = WordPreTokenizer::new().unwrap();
    let char_tok = CharPreTokenizer::default();
    let words: Vec<String> = LINES.iter().flat_map(|l| word_tok.pre_tokenize(l)).collect();
    let chars: Vec<String> = words.iter().flat_map(|w| char_tok.pre_tokenize(w)).collect();

    let word_path = dir.join("word_tokenizer.json");
    let char_path = dir.join("char_tokenizer.json");
    fs::write(&word_path, word_level_json(&words)).unwrap();
    fs::write(&char_path, word_level_json(&chars)).unwrap();
    (word_path, char_path)
}

fn build_loader(
    dir: &Path,
    options: BatchLoaderOptions,
) -> BatchLoader {
    let (word_path, char_path) = write_fixture(dir);

    let word_vocab = HfTokenizerService::from_file(word_path, SpecialTokens::default()).unwrap();
    let char_vocab = HfTokenizerService::from_file(char_path, SpecialTokens::default()).unwrap();
    let encoder = BatchEncoder::new(
        Arc::new(word_vocab),
        Arc::new(char_vocab),
        Arc::new(CharPreTokenizer::default()),
        BatchEncoderOptions::default(),
    )
    .unwrap();

    let provider = SampleProviderOptions::default()
        .with_min_num_tokens(5)
        .init(dir)
        .unwrap();

    BatchLoader::new(provider, encoder, options).unwrap()
}

#[test]
fn test_loader_end_to_end() {
    let dir = TempDir::new("pipeline").unwrap();
    let loader = build_loader(
        dir.path(),
        BatchLoaderOptions::default().with_batch_size(3).with_seed(12),
    );
    assert_eq!(loader.len(), LINES.len() / 3);

    for batch in loader.iter() {
        let batch = batch.unwrap();
        batch.validate().unwrap();
        assert_eq!(batch.batch_size(), 3);
        assert_eq!(batch.char_input_ids.nrows(), 3 * batch.word_seq_len());
        assert!(batch.word_seq_len() <= 192);
        assert!(batch.char_seq_len() <= 16);
        assert!(batch.detection_labels.iter().all(|&l| l <= 1));

        for (pos, _) in batch.correction_targets() {
            let (i, j) = (pos / batch.word_seq_len(), pos % batch.word_seq_len());
            assert_eq!(batch.detection_labels[[i, j]], 1);
        }
    }

    let again = build_loader(
        dir.path(),
        BatchLoaderOptions::default().with_batch_size(3).with_seed(12),
    );
    assert_eq!(loader.batch(1).unwrap(), again.batch(1).unwrap());
}

#[test]
fn test_trained_vocab_round_trips_corpus_words() {
    let dir = TempDir::new("pipeline").unwrap();
    let (word_path, _) = write_fixture(dir.path());
    let service = HfTokenizerService::from_file(word_path, SpecialTokens::default()).unwrap();

    let words = WordPreTokenizer::new().unwrap().pre_tokenize(LINES[1]);
    let batch = service
        .encode_batch(&[words.join(" ")], &EncodeOptions::padded(BatchEncoderOptions::default().max_words))
        .unwrap();
    let tokens = service.ids_to_tokens(&batch.rows()[0].ids).unwrap();

    assert_eq!(tokens.first().map(String::as_str), Some("[CLS]"));
    assert_eq!(tokens.last().map(String::as_str), Some("[SEP]"));
    assert_eq!(&tokens[1..tokens.len() - 1], words.as_slice());
}
