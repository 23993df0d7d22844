use serde_json::{json, Value};

use super::{Artifact, Catalog};

pub const TITLES: [&str; 8] = [
    "The Matrix",
    "The Matrix Reloaded",
    "Heat",
    "Inception",
    "Toy Story",
    "Ronin",
    "Solaris",
    "Heat",
];

/// Small catalog with hand-picked vectors
///
/// Against "The Matrix" (row 0) the scores are:
/// 1 → 1.1, 3 → 0.5, 6 → 0.1, 5 → 0.05, and 2, 4, 7 → 0.0.
pub fn artifact_json() -> Value {
    json!({
        "movies": [
            {
                "title": "The Matrix",
                "overview": "A hacker learns the world is a simulation.",
                "genres": "[{'id': 28, 'name': 'Action'}, {'id': 878, 'name': 'Science Fiction'}]",
                "release_date": "1999-03-30",
                "vote_average": 7.9,
                "imdb_id": "tt0133093"
            },
            {
                "title": "The Matrix Reloaded",
                "genres": "[{'id': 28, 'name': 'Action'}]",
                "release_date": "2003-05-15",
                "vote_average": 6.9,
                "imdb_id": "tt0234215"
            },
            {
                "title": "Heat",
                "genres": "[{'id': 80, 'name': 'Crime'}]",
                "release_date": "1995-12-15",
                "vote_average": 7.7,
                "imdb_id": "tt0113277"
            },
            {
                "title": "Inception",
                "genres": [{ "id": 878, "name": "Science Fiction" }],
                "release_date": "2010-07-15",
                "vote_average": 8.1,
                "imdb_id": "tt1375666"
            },
            {
                "title": "Toy Story",
                "genres": "not a list",
                "release_date": "1995-10-30",
                "vote_average": 7.7,
                "imdb_id": "nan"
            },
            {
                "title": "Ronin",
                "release_date": null,
                "vote_average": 6.8,
                "imdb_id": ""
            },
            {
                "title": "Solaris",
                "vote_average": 6.2,
                "imdb_id": null
            },
            {
                "title": "Heat",
                "vote_average": 5.0,
                "imdb_id": "tt9999999"
            }
        ],
        "matrix": {
            "vocabulary_size": 4,
            "rows": [
                { "indices": [0, 1], "values": [1.0, 0.5] },
                { "indices": [0, 1], "values": [0.9, 0.4] },
                { "indices": [2], "values": [1.0] },
                { "indices": [0, 3], "values": [0.5, 0.5] },
                { "indices": [3], "values": [1.0] },
                { "indices": [1, 2], "values": [0.1, 0.6] },
                { "indices": [1, 3], "values": [0.2, 0.1] },
                { "indices": [2], "values": [0.3] }
            ]
        }
    })
}

pub fn catalog() -> Catalog {
    let artifact: Artifact = serde_json::from_value(artifact_json()).unwrap();
    Catalog::from_artifact(artifact).unwrap()
}
