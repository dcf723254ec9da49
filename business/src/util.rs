/*  kokpit-auth: Reporting Portal Authenticator
 *  Copyright (C) 2023 The kokpit-auth developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::error::Error as StdError;
use std::sync::Arc;

/// Erase a concrete error into the opaque context variant of a crate error.
pub fn wrap_err<E, D>(error: E) -> D
where
    E: StdError + Send + Sync + 'static,
    D: From<Arc<dyn StdError + Send + Sync>>,
{
    D::from(Arc::new(error) as Arc<dyn StdError + Send + Sync>)
}
