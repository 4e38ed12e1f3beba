// End-to-end integration tests for the Read Aloud Backend API
//
// Each test spins up two in-process servers on random local ports:
// - a fake learning service (documents, chunking, summaries) that the real
//   HttpLearningRepository talks to over HTTP
// - the application router itself, with a fake TTS repository standing in
//   for OpenAI
//
// Tests drive the public HTTP API with a hyper client, acting as both the UI
// (session control) and the speaking device (utterance polling, signals).

mod test_read_aloud;
mod test_speech;
mod test_voices;
