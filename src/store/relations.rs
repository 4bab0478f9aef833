use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

/// The errors that can be reported by the mutating store operations.
///
/// Every failure leaves the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The username was already taken at registration time
    UsernameTaken,
    /// A friend request between the two users is already awaiting a decision
    RequestAlreadyPending,
    /// The two users are already friends
    AlreadyFriends,
    /// There is no pending friend request the addressed user could respond to
    NoSuchPendingRequest,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UsernameTaken => write!(f, "Username is already occupied"),
            StoreError::RequestAlreadyPending => write!(f, "Friendship request already exists"),
            StoreError::AlreadyFriends => write!(f, "Users are already friends"),
            StoreError::NoSuchPendingRequest => {
                write!(f, "Friendship request does not exist")
            }
        }
    }
}

/// The store of all registered users, their pending friend requests and
/// their confirmed friendships.
///
/// The friendship relation is kept symmetric at all times: `a` is listed
/// as a friend of `b` if and only if `b` is listed as a friend of `a`.
/// Pending requests are directional, at most one exists per ordered pair.
///
/// The store owns its collections exclusively. Handlers share it through
/// [crate::server::StoreData] and take the store-wide lock for every
/// operation.
pub struct RelationStore {
    /// username -> password
    users: HashMap<String, String>,
    /// sender -> usernames the sender has an unresolved request to
    pending_requests: HashMap<String, HashSet<String>>,
    /// symmetric adjacency of confirmed friendships
    friends: HashMap<String, HashSet<String>>,
}

impl RelationStore {
    /// Creates a store without any registered users
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            pending_requests: HashMap::new(),
            friends: HashMap::new(),
        }
    }

    /// Registers a new user.
    ///
    /// Fails with [StoreError::UsernameTaken] if the username is already
    /// registered. On success the user starts out with no pending
    /// requests and no friends.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), StoreError> {
        if self.users.contains_key(username) {
            return Err(StoreError::UsernameTaken);
        }

        self.users.insert(username.to_string(), password.to_string());
        self.pending_requests
            .insert(username.to_string(), HashSet::new());
        self.friends.insert(username.to_string(), HashSet::new());

        Ok(())
    }

    /// Returns whether a user with the given username is registered
    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Returns the usernames of all registered users.
    ///
    /// The order of the returned names is unspecified.
    pub fn usernames(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    /// Returns whether the user exists and the stored password matches
    /// the given one exactly
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map_or(false, |stored| stored == password)
    }

    /// Records a friend request from `from` to `to`.
    ///
    /// Fails with [StoreError::RequestAlreadyPending] if a request
    /// between the two users is unresolved in either direction. A request
    /// towards a user who has already sent one is rejected, never
    /// auto-accepted. Fails with [StoreError::AlreadyFriends] if the two
    /// users are friends.
    ///
    /// Both users must be registered, the caller is expected to have
    /// checked this via [Self::user_exists].
    pub fn send_friend_request(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        if self.has_pending(from, to) || self.has_pending(to, from) {
            return Err(StoreError::RequestAlreadyPending);
        }

        if self.are_friends(from, to) {
            return Err(StoreError::AlreadyFriends);
        }

        self.pending_requests
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());

        Ok(())
    }

    /// Resolves the pending friend request `requester -> responder`.
    ///
    /// Only the addressed user may respond, so the direction matters:
    /// fails with [StoreError::NoSuchPendingRequest] if `requester` has
    /// no unresolved request towards `responder`. The pending request is
    /// consumed whether it is accepted or declined. Accepting creates the
    /// friendship in both directions, declining leaves no trace, so a
    /// fresh request between the two users is permitted afterwards.
    pub fn respond_to_friend_request(
        &mut self,
        responder: &str,
        requester: &str,
        accept: bool,
    ) -> Result<(), StoreError> {
        let open = self
            .pending_requests
            .get_mut(requester)
            .ok_or(StoreError::NoSuchPendingRequest)?;

        if !open.remove(responder) {
            return Err(StoreError::NoSuchPendingRequest);
        }

        if accept {
            self.friends
                .entry(responder.to_string())
                .or_default()
                .insert(requester.to_string());
            self.friends
                .entry(requester.to_string())
                .or_default()
                .insert(responder.to_string());
        }

        Ok(())
    }

    /// Returns the usernames of all friends of the given user.
    ///
    /// A user without friends yields an empty list. The order of the
    /// returned names is unspecified.
    pub fn friends_of(&self, username: &str) -> Vec<String> {
        self.friends
            .get(username)
            .map(|friends| friends.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the usernames of all users with an unresolved friend
    /// request addressed to the given user
    pub fn incoming_requests(&self, username: &str) -> Vec<String> {
        self.pending_requests
            .iter()
            .filter(|(_, open)| open.contains(username))
            .map(|(sender, _)| sender.clone())
            .collect()
    }

    /// The number of registered users
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// The number of unresolved friend requests
    pub fn pending_request_count(&self) -> usize {
        self.pending_requests.values().map(HashSet::len).sum()
    }

    /// The number of confirmed friendships, each counted once
    pub fn friendship_count(&self) -> usize {
        self.friends
            .iter()
            .flat_map(|(user, friends)| friends.iter().map(move |friend| (user, friend)))
            .filter(|(user, friend)| user <= friend)
            .count()
    }

    fn has_pending(&self, from: &str, to: &str) -> bool {
        self.pending_requests
            .get(from)
            .map_or(false, |open| open.contains(to))
    }

    fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friends
            .get(a)
            .map_or(false, |friends| friends.contains(b))
    }
}

impl Default for RelationStore {
    fn default() -> Self {
        Self::new()
    }
}
