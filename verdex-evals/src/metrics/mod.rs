// Copyright 2026 Verdex (https://github.com/verdex-eval/verdex)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Built-in metrics for common evaluation needs

pub mod answer_relevancy;
pub mod answer_similarity;
pub mod fact_adherence;
pub mod safety;

pub use answer_relevancy::AnswerRelevancy;
pub use answer_similarity::AnswerSimilarity;
pub use fact_adherence::FactAdherence;
pub use safety::Safety;
