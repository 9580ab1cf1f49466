pub mod membership;
pub mod team;
pub mod user;

/*
 A user record owns all of its credential digests: the password digest, the
 activation/reset/remember token digests, and the unique API authentication
 token. Plaintext tokens are never stored; they exist only in the response
 that hands them to the caller (and in the notification event that mails
 them out).

 Teams grant nothing by themselves. Access decisions come from membership
 rows (user_id, team_id, role) and the guardian layer in the main crate.
 */
