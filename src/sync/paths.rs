//! Logical document paths in the remote store tree

/// A logical path into the store, rendered under a configured root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocPath {
    Team {
        tournament_id: String,
        team_id: String,
    },
    Group {
        tournament_id: String,
        group_id: String,
    },
    Match {
        tournament_id: String,
        match_id: String,
    },
    /// The single live-match projection document
    LiveMatch,
    /// Assigned tournament/match pointers for one operator account
    Permissions { username: String },
}

impl DocPath {
    pub fn match_doc(tournament_id: &str, match_id: &str) -> DocPath {
        DocPath::Match {
            tournament_id: tournament_id.to_string(),
            match_id: match_id.to_string(),
        }
    }

    pub fn permissions(username: &str) -> DocPath {
        DocPath::Permissions {
            username: username.to_string(),
        }
    }

    /// Render the full store path under `root`
    pub fn render(&self, root: &str) -> String {
        match self {
            DocPath::Team {
                tournament_id,
                team_id,
            } => format!("{}/{}/Teams/{}", root, tournament_id, team_id),
            DocPath::Group {
                tournament_id,
                group_id,
            } => format!("{}/{}/Groups/{}", root, tournament_id, group_id),
            DocPath::Match {
                tournament_id,
                match_id,
            } => format!("{}/{}/Matches/{}", root, tournament_id, match_id),
            DocPath::LiveMatch => format!("{}/LiveMatch", root),
            DocPath::Permissions { username } => {
                format!("{}/AppConfig/Users/{}/permissions", root, username)
            }
        }
    }
}
